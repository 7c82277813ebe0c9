//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a portal account can hold.
///
/// A role is fixed at registration; nothing in the portal changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Enrolled student, supervised by at most one supervisor.
    Student,
    /// Academic staff member who supervises students.
    Supervisor,
    /// Administrator of the whole portal.
    Superadmin,
}

impl UserRole {
    /// Every role, in display order.
    pub const ALL: [UserRole; 3] = [Self::Student, Self::Supervisor, Self::Superadmin];

    /// Check if this role is the superadmin role.
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Self::Superadmin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Supervisor => "supervisor",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "supervisor" => Ok(Self::Supervisor),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: student, supervisor, superadmin"
            ))),
        }
    }
}
