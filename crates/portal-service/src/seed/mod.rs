//! Idempotent demo data.

pub mod data;
pub mod service;

pub use service::{DISABLED_CREDENTIAL, SeedOptions, SeedReport, SeedService, SuperadminSeed};
