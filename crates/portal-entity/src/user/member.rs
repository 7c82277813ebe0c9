//! Role-tagged views over a [`User`].
//!
//! Operations that only make sense for one role take the matching view, so
//! a supervisor-only rule cannot be handed a student by mistake.

use portal_core::types::{DepartmentId, UserId};

use super::model::User;

/// A user seen through its role.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    /// A student account.
    Student(Student<'a>),
    /// A supervisor account.
    Supervisor(Supervisor<'a>),
    /// A superadmin account.
    Superadmin(&'a User),
}

impl<'a> Member<'a> {
    /// The underlying account.
    pub fn user(&self) -> &'a User {
        match self {
            Self::Student(s) => s.0,
            Self::Supervisor(s) => s.0,
            Self::Superadmin(u) => u,
        }
    }
}

/// Student capabilities.
#[derive(Debug, Clone, Copy)]
pub struct Student<'a>(pub(crate) &'a User);

impl<'a> Student<'a> {
    pub fn user(&self) -> &'a User {
        self.0
    }

    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        self.0.department_id
    }

    /// Current supervisor, if any.
    pub fn supervisor_id(&self) -> Option<UserId> {
        self.0.supervisor_id
    }

    /// Check if the student is supervised by `supervisor`.
    pub fn is_supervised_by(&self, supervisor: UserId) -> bool {
        self.0.supervisor_id == Some(supervisor)
    }
}

/// Supervisor capabilities.
#[derive(Debug, Clone, Copy)]
pub struct Supervisor<'a>(pub(crate) &'a User);

impl<'a> Supervisor<'a> {
    pub fn user(&self) -> &'a User {
        self.0
    }

    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn name(&self) -> &'a str {
        &self.0.name
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        self.0.department_id
    }
}
