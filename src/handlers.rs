pub mod auth;
pub mod categories;
pub mod health;
pub mod persons;
pub mod salaries;
pub mod stats;
pub mod templates;
