//! Department administration and reporting.

pub mod service;

pub use service::DepartmentService;
