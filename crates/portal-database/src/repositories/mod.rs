//! PostgreSQL repositories implementing the store traits.

pub mod assignment;
pub mod department;
pub mod user;

use portal_core::error::{AppError, ErrorKind};

pub use assignment::AssignmentRepository;
pub use department::DepartmentRepository;
pub use user::UserRepository;

/// Wrap a sqlx error as a database error with context.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Name of the violated constraint, if `err` is a constraint violation.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
