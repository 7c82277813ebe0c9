//! Student to supervisor assignment and the filtered lookups around it.

pub mod service;

pub use service::AssignmentService;
