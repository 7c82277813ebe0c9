//! User accounts, roles and listing filters.

pub mod email;
pub mod filter;
pub mod member;
pub mod model;
pub mod role;
pub mod stats;
pub mod status;

pub use email::EmailPolicy;
pub use filter::{AccountFilter, StudentFilter, SupervisorFilter, SupervisorListFilter};
pub use member::{Member, Student, Supervisor};
pub use model::{NewUser, User};
pub use role::UserRole;
pub use stats::AccountCounts;
pub use status::UserStatus;
