//! Listing filters for user queries.
//!
//! Each filter knows how to test a single [`User`] so in-memory stores and
//! SQL repositories agree on what a listing returns.

use std::str::FromStr;

use portal_core::AppError;
use portal_core::types::{DepartmentId, SearchTerm, UserId};
use portal_core::types::search::search_term;
use serde::{Deserialize, Serialize};

use super::model::User;
use super::role::UserRole;
use super::status::UserStatus;

/// Restriction on which supervisor a listed student has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "supervisor_id")]
pub enum SupervisorFilter {
    /// No restriction.
    #[default]
    Any,
    /// Only students without a supervisor.
    Unassigned,
    /// Only students of this supervisor.
    Supervisor(UserId),
}

impl SupervisorFilter {
    pub fn matches(&self, student: &User) -> bool {
        match self {
            Self::Any => true,
            Self::Unassigned => student.supervisor_id.is_none(),
            Self::Supervisor(id) => student.supervisor_id == Some(*id),
        }
    }
}

impl FromStr for SupervisorFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" | "any" => Ok(Self::Any),
            "unassigned" | "none" => Ok(Self::Unassigned),
            other => other
                .parse::<UserId>()
                .map(Self::Supervisor)
                .map_err(|_| {
                    AppError::validation(format!(
                        "Invalid supervisor filter: '{other}'. Expected all, unassigned or a supervisor id"
                    ))
                }),
        }
    }
}

/// Filter for student listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFilter {
    /// Matched against name, email and matric number.
    pub search: Option<SearchTerm>,
    /// Supervisor restriction.
    pub supervisor: SupervisorFilter,
    /// Only students of this department.
    pub department_id: Option<DepartmentId>,
}

impl StudentFilter {
    pub fn with_search(mut self, raw: Option<&str>) -> Self {
        self.search = search_term(raw);
        self
    }

    pub fn with_supervisor(mut self, supervisor: SupervisorFilter) -> Self {
        self.supervisor = supervisor;
        self
    }

    pub fn in_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        user.is_student()
            && self.supervisor.matches(user)
            && self
                .department_id
                .is_none_or(|dept| user.department_id == Some(dept))
            && self.search.as_ref().is_none_or(|term| {
                term.matches_any([
                    Some(user.name.as_str()),
                    Some(user.email.as_str()),
                    user.matric_no.as_deref(),
                ])
            })
    }
}

/// Filter for supervisor listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorListFilter {
    /// Matched against name and email.
    pub search: Option<SearchTerm>,
    /// Only supervisors of this department.
    pub department_id: Option<DepartmentId>,
    /// Only supervisors holding fewer students than this. Needs live counts,
    /// so stores apply it alongside [`SupervisorListFilter::matches`].
    pub below_capacity: Option<u32>,
}

impl SupervisorListFilter {
    pub fn with_search(mut self, raw: Option<&str>) -> Self {
        self.search = search_term(raw);
        self
    }

    pub fn in_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Keep only supervisors that can still take a student.
    pub fn with_free_slots(mut self, capacity: u32) -> Self {
        self.below_capacity = Some(capacity);
        self
    }

    /// Whether a supervisor holding `assigned` students passes the capacity cut.
    pub fn has_room(&self, assigned: u32) -> bool {
        self.below_capacity.is_none_or(|cap| assigned < cap)
    }

    pub fn matches(&self, user: &User) -> bool {
        user.is_supervisor()
            && self
                .department_id
                .is_none_or(|dept| user.department_id == Some(dept))
            && self.search.as_ref().is_none_or(|term| {
                term.matches_any([Some(user.name.as_str()), Some(user.email.as_str())])
            })
    }
}

/// Filter for the superadmin account listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilter {
    /// Matched against name, email and matric number.
    pub search: Option<SearchTerm>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    /// Account left out of the listing, normally the caller.
    pub exclude: Option<UserId>,
}

impl AccountFilter {
    pub fn with_search(mut self, raw: Option<&str>) -> Self {
        self.search = search_term(raw);
        self
    }

    pub fn with_role(mut self, role: Option<UserRole>) -> Self {
        self.role = role;
        self
    }

    pub fn with_status(mut self, status: Option<UserStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn excluding(mut self, user_id: UserId) -> Self {
        self.exclude = Some(user_id);
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        self.exclude.is_none_or(|id| user.id != id)
            && self.role.is_none_or(|role| user.role == role)
            && self.status.is_none_or(|status| user.status == status)
            && self.search.as_ref().is_none_or(|term| {
                term.matches_any([
                    Some(user.name.as_str()),
                    Some(user.email.as_str()),
                    user.matric_no.as_deref(),
                ])
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::model::fixtures::user;

    #[test]
    fn test_supervisor_filter_parse() {
        assert_eq!("".parse::<SupervisorFilter>().unwrap(), SupervisorFilter::Any);
        assert_eq!(
            "unassigned".parse::<SupervisorFilter>().unwrap(),
            SupervisorFilter::Unassigned
        );
        let id = UserId::new();
        assert_eq!(
            id.to_string().parse::<SupervisorFilter>().unwrap(),
            SupervisorFilter::Supervisor(id)
        );
        assert!("bogus".parse::<SupervisorFilter>().is_err());
    }

    #[test]
    fn test_student_filter() {
        let dept = DepartmentId::new();
        let supervisor = user(UserRole::Supervisor, Some(dept));
        let mut student = user(UserRole::Student, Some(dept));
        student.name = "Ada Obi".to_string();
        student.matric_no = Some("2021001".to_string());

        let filter = StudentFilter::default().in_department(dept);
        assert!(filter.matches(&student));
        assert!(!filter.matches(&supervisor));
        assert!(filter.clone().with_search(Some("obi")).matches(&student));
        assert!(filter.clone().with_search(Some("20210")).matches(&student));
        assert!(!filter.clone().with_search(Some("zed")).matches(&student));

        let unassigned = filter.clone().with_supervisor(SupervisorFilter::Unassigned);
        assert!(unassigned.matches(&student));
        student.supervisor_id = Some(supervisor.id);
        assert!(!unassigned.matches(&student));
        assert!(filter
            .with_supervisor(SupervisorFilter::Supervisor(supervisor.id))
            .matches(&student));
    }

    #[test]
    fn test_supervisor_list_filter_room() {
        let filter = SupervisorListFilter::default();
        assert!(filter.has_room(100));
        let filter = filter.with_free_slots(8);
        assert!(filter.has_room(7));
        assert!(!filter.has_room(8));
    }

    #[test]
    fn test_account_filter_excludes_caller() {
        let admin = user(UserRole::Superadmin, None);
        let student = user(UserRole::Student, Some(DepartmentId::new()));
        let filter = AccountFilter::default().excluding(admin.id);
        assert!(!filter.matches(&admin));
        assert!(filter.matches(&student));
        assert!(!filter
            .clone()
            .with_role(Some(UserRole::Supervisor))
            .matches(&student));
        assert!(!filter
            .with_status(Some(UserStatus::Paused))
            .matches(&student));
    }
}
