use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{salary_record, user};

/// A household member whose salary is tracked.
///
/// The `*_history` fields hold contribution totals accumulated before the
/// first tracked record and seed the cumulative contribution series.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "persons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub note: Option<String>,
    pub user_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub pension_history: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub medical_history: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub housing_fund_history: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "salary_record::Entity")]
    SalaryRecord,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<salary_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalaryRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
