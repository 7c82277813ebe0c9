//! Core type definitions used across the portal workspace.

pub mod id;
pub mod pagination;
pub mod search;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use search::SearchTerm;
