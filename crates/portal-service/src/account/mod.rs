//! Superadmin account management.

pub mod service;

pub use service::AccountService;
