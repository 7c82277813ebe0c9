//! Department entity model.

use chrono::{DateTime, Utc};
use portal_core::types::{DepartmentId, SearchTerm};
use portal_core::types::search::search_term;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Maximum length of a department name.
pub const MAX_NAME_LENGTH: u64 = 255;
/// Maximum length of a department description.
pub const MAX_DESCRIPTION_LENGTH: u64 = 1000;

/// An academic department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Unique department identifier.
    pub id: DepartmentId,
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Inactive departments accept no new registrations.
    pub is_active: bool,
    /// When the department was created.
    pub created_at: DateTime<Utc>,
    /// When the department was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a department.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 255, message = "Department name is required and may not exceed 255 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description may not exceed 1000 characters"))]
    pub description: Option<String>,
    pub is_active: bool,
}

impl CreateDepartment {
    /// Build an input with the name trimmed and a blank description dropped.
    pub fn new(name: &str, description: Option<&str>, is_active: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            description: normalize_description(description),
            is_active,
        }
    }
}

/// Input for updating a department. Every field is replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDepartment {
    #[validate(length(min = 1, max = 255, message = "Department name is required and may not exceed 255 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description may not exceed 1000 characters"))]
    pub description: Option<String>,
    pub is_active: bool,
}

impl UpdateDepartment {
    pub fn new(name: &str, description: Option<&str>, is_active: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            description: normalize_description(description),
            is_active,
        }
    }

    /// Start from the current values of `department`.
    pub fn from_current(department: &Department) -> Self {
        Self {
            name: department.name.clone(),
            description: department.description.clone(),
            is_active: department.is_active,
        }
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// A department with its member counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DepartmentSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub department: Department,
    pub student_count: i64,
    pub supervisor_count: i64,
}

/// Portal-wide department counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

/// Member counts inside one department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DepartmentMembers {
    pub total_students: i64,
    pub total_supervisors: i64,
    pub unassigned_students: i64,
}

/// Department detail as shown on the overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentOverview {
    pub department: Department,
    pub members: DepartmentMembers,
}

/// Filter for department listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentFilter {
    /// Matched against name and description.
    pub search: Option<SearchTerm>,
}

impl DepartmentFilter {
    pub fn with_search(mut self, raw: Option<&str>) -> Self {
        self.search = search_term(raw);
        self
    }

    pub fn matches(&self, department: &Department) -> bool {
        self.search.as_ref().is_none_or(|term| {
            term.matches_any([
                Some(department.name.as_str()),
                department.description.as_deref(),
            ])
        })
    }
}
