//! Tabular data models

pub mod sources;
pub mod table;

pub use sources::{AidTable, CohortTable, EnrollmentTable, IdSet};
pub use table::Table;
