//! This file serves as the root for all SeaORM entity modules.
//! Ownership runs user -> person -> salary record, and user -> salary template.

pub mod person;
pub mod salary_record;
pub mod salary_template;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::person::Entity as Person;
    pub use super::salary_record::Entity as SalaryRecord;
    pub use super::salary_template::Entity as SalaryTemplate;
    pub use super::user::Entity as User;
}
