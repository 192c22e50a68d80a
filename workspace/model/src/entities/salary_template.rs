use sea_orm::entity::prelude::*;

use super::user;

/// A named set of default category amounts.
///
/// Each `*_template` column is a JSON object mapping a free-form category
/// name to an amount. Deleted templates are kept with `is_active = false`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salary_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub allowances_template: Option<Json>,
    pub bonuses_template: Option<Json>,
    pub deductions_template: Option<Json>,
    #[sea_orm(default_value = "false")]
    pub is_default: bool,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
