//! # portal-entity
//!
//! Domain entity models for the department portal. Every struct in this
//! crate represents a database table row or a domain value object.
//! Database entities derive `sqlx::FromRow`.
//!
//! The supervisor assignment rule lives in [`assignment::plan`] so that
//! every store applies the same checks inside its own atomic section.

pub mod assignment;
pub mod department;
pub mod user;
pub mod validation;
