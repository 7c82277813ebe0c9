//! Core traits shared by the portal crates.

pub mod service;

pub use service::Service;
