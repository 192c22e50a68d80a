use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::person;

/// One month of pay for one person. `(person_id, year, month)` is unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salary_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub person_id: i32,
    pub year: i32,
    /// 1 to 12.
    pub month: i32,

    // Income items
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub base_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub performance_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub high_temp_allowance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub low_temp_allowance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub computer_allowance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub meal_allowance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub mid_autumn_benefit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub dragon_boat_benefit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub spring_festival_benefit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub other_income: Decimal,

    // Deduction items
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub pension_insurance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub medical_insurance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub unemployment_insurance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub critical_illness_insurance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub enterprise_annuity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub housing_fund: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub other_deductions: Decimal,

    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tax: Decimal,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "person::Entity",
        from = "Column::PersonId",
        to = "person::Column::Id",
        on_delete = "Cascade"
    )]
    Person,
}

impl Related<person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
