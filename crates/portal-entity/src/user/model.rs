//! User entity model.

use chrono::{DateTime, Utc};
use portal_core::types::{DepartmentId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::member::{Member, Student, Supervisor};
use super::role::UserRole;
use super::status::UserStatus;

/// A portal account: student, supervisor or superadmin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Opaque credential hash produced outside the portal.
    #[serde(skip_serializing, default)]
    pub credential_hash: String,
    /// Matriculation number, students only.
    pub matric_no: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Owning department. Absent only for superadmins.
    pub department_id: Option<DepartmentId>,
    /// Assigned supervisor, students only.
    pub supervisor_id: Option<UserId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account is active.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Check if this user is a student.
    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    /// Check if this user is a supervisor.
    pub fn is_supervisor(&self) -> bool {
        self.role == UserRole::Supervisor
    }

    /// Check if this user is a superadmin.
    pub fn is_superadmin(&self) -> bool {
        self.role.is_superadmin()
    }

    /// View this account through its role.
    pub fn member(&self) -> Member<'_> {
        match self.role {
            UserRole::Student => Member::Student(Student(self)),
            UserRole::Supervisor => Member::Supervisor(Supervisor(self)),
            UserRole::Superadmin => Member::Superadmin(self),
        }
    }

    /// Student capabilities, if this account is a student.
    pub fn as_student(&self) -> Option<Student<'_>> {
        match self.member() {
            Member::Student(student) => Some(student),
            _ => None,
        }
    }

    /// Supervisor capabilities, if this account is a supervisor.
    pub fn as_supervisor(&self) -> Option<Supervisor<'_>> {
        match self.member() {
            Member::Supervisor(supervisor) => Some(supervisor),
            _ => None,
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Pre-hashed credential.
    pub credential_hash: String,
    /// Matriculation number (students).
    pub matric_no: Option<String>,
    /// Role to register with.
    pub role: UserRole,
    /// Initial status.
    pub status: UserStatus,
    /// Owning department.
    pub department_id: Option<DepartmentId>,
    /// Initial supervisor (seeding only).
    pub supervisor_id: Option<UserId>,
}

impl NewUser {
    /// Materialize the row with a fresh id and timestamps.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::new(),
            name: self.name,
            email: self.email,
            credential_hash: self.credential_hash,
            matric_no: self.matric_no,
            role: self.role,
            status: self.status,
            department_id: self.department_id,
            supervisor_id: self.supervisor_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(role: UserRole, department_id: Option<DepartmentId>) -> User {
        NewUser {
            name: format!("Test {role}"),
            email: format!("{}@bouesti.edu.ng", UserId::new()),
            credential_hash: "!".to_string(),
            matric_no: None,
            role,
            status: UserStatus::Active,
            department_id,
            supervisor_id: None,
        }
        .into_user(Utc::now())
    }
}
