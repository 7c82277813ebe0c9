//! The acting user of an operation.

use serde::{Deserialize, Serialize};

use portal_core::error::AppError;
use portal_core::types::UserId;
use portal_entity::user::{User, UserRole};

/// Who is performing an operation.
///
/// Supplied by the identity collaborator (or resolved by the CLI from
/// `--actor`) and passed into every service method that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: UserId,
    pub role: UserRole,
}

impl ActorContext {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Context for an already loaded account.
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.role)
    }

    pub fn is_superadmin(&self) -> bool {
        self.role.is_superadmin()
    }

    /// Fail unless the actor is a superadmin.
    pub fn require_superadmin(&self) -> Result<(), AppError> {
        if self.is_superadmin() {
            Ok(())
        } else {
            Err(AppError::authorization(
                "This action requires the superadmin role",
            ))
        }
    }

    /// Fail unless the actor is a superadmin or `user_id` itself.
    pub fn require_self_or_superadmin(&self, user_id: UserId) -> Result<(), AppError> {
        if self.is_superadmin() || self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::authorization("Access denied"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::error::ErrorKind;

    #[test]
    fn test_require_superadmin() {
        let admin = ActorContext::new(UserId::new(), UserRole::Superadmin);
        let supervisor = ActorContext::new(UserId::new(), UserRole::Supervisor);
        assert!(admin.require_superadmin().is_ok());
        assert_eq!(
            supervisor.require_superadmin().unwrap_err().kind,
            ErrorKind::Authorization
        );
    }

    #[test]
    fn test_require_self_or_superadmin() {
        let supervisor = ActorContext::new(UserId::new(), UserRole::Supervisor);
        assert!(supervisor.require_self_or_superadmin(supervisor.user_id).is_ok());
        assert!(supervisor.require_self_or_superadmin(UserId::new()).is_err());
    }
}
