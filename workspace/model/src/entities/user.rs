use sea_orm::entity::prelude::*;

/// An account holder. Owns persons and salary templates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// PHC-formatted argon2 hash.
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::person::Entity")]
    Person,
    #[sea_orm(has_many = "super::salary_template::Entity")]
    SalaryTemplate,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl Related<super::salary_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalaryTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
