//! Supervisor assignment rules and load reporting.

pub mod load;
pub mod plan;

pub use load::{LoadBand, SupervisorLoad, SupervisorLoadStats};
pub use plan::{AssignmentPlan, AssignmentRequest};
