//! Self-registration of students and supervisors.

pub mod service;

pub use service::{RegisterAccount, RegistrationService};
