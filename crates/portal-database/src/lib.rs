//! # portal-database
//!
//! PostgreSQL connection management, migrations and the store backends the
//! portal services run against: sqlx repositories for production and an
//! in-memory store for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{AssignmentStore, DepartmentStore, Stores, UserStore};
