//! SeaORM models for the HR schema.

pub mod attendance;
pub mod benefit;
pub mod department;
pub mod dependent;
pub mod document;
pub mod employee;
pub mod employee_benefit;
pub mod employee_training;
pub mod evaluation;
pub mod position;
pub mod training;
pub mod users;
pub mod vacation;
