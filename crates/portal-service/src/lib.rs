//! # portal-service
//!
//! Business logic service layer for the department portal. Each service
//! works against the store traits from `portal-database`, so the same code
//! runs over PostgreSQL or the in-memory store.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod account;
pub mod assignment;
pub mod context;
pub mod dashboard;
pub mod department;
pub mod registration;
pub mod seed;
pub mod state;

pub use account::AccountService;
pub use assignment::AssignmentService;
pub use context::ActorContext;
pub use dashboard::{Dashboard, DashboardService};
pub use department::DepartmentService;
pub use registration::{RegisterAccount, RegistrationService};
pub use seed::{SeedOptions, SeedReport, SeedService, SuperadminSeed};
pub use state::AppState;
