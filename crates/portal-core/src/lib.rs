//! # portal-core
//!
//! Core crate for the department portal. Contains configuration schemas,
//! typed identifiers, pagination and search types, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other portal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
