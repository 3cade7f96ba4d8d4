//! HR domain store.
//!
//! [`HrStore`] owns every read and write against the HR schema. Callers hand
//! it plain input records and get entity models (or small view structs) back;
//! nothing outside this crate mutates HR rows directly.

pub mod clock;
pub mod error;
pub mod model;
pub mod policy;

mod attendance;
mod benefits;
mod departments;
mod documents;
mod employees;
mod evaluations;
mod reports;
mod store;
mod training;
mod vacations;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{HrError, HrResult};
pub use model::*;
pub use policy::{DELETION_POLICY, DeleteRule, EntityKind, OnDelete};
pub use store::HrStore;
