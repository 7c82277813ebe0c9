//! The supervisor assignment rule.
//!
//! Stores load the supervisor, the requested students and the supervisor's
//! current student count inside one atomic section, then call
//! [`AssignmentPlan::build`]. Only a successful plan may be applied.

use std::collections::BTreeSet;

use portal_core::AppError;
use portal_core::types::{DepartmentId, UserId};
use serde::{Deserialize, Serialize};

use crate::user::{Student, Supervisor, User};

/// A request to give students a supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub supervisor_id: UserId,
    /// Distinct student ids, in id order.
    pub student_ids: BTreeSet<UserId>,
    /// When set, every party must belong to this department.
    pub department_scope: Option<DepartmentId>,
}

impl AssignmentRequest {
    /// Assign a single student.
    pub fn single(student_id: UserId, supervisor_id: UserId) -> Self {
        Self {
            supervisor_id,
            student_ids: BTreeSet::from([student_id]),
            department_scope: None,
        }
    }

    /// Assign several students at once. Duplicate ids collapse.
    pub fn bulk(
        student_ids: impl IntoIterator<Item = UserId>,
        supervisor_id: UserId,
    ) -> Result<Self, AppError> {
        let student_ids: BTreeSet<UserId> = student_ids.into_iter().collect();
        if student_ids.is_empty() {
            return Err(AppError::validation("Please select at least one student."));
        }
        Ok(Self {
            supervisor_id,
            student_ids,
            department_scope: None,
        })
    }

    /// Restrict the request to one department.
    pub fn scoped_to(mut self, department_id: DepartmentId) -> Self {
        self.department_scope = Some(department_id);
        self
    }

    pub fn ids(&self) -> Vec<UserId> {
        self.student_ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.student_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.student_ids.is_empty()
    }
}

/// A validated assignment, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPlan {
    pub supervisor_id: UserId,
    pub student_ids: Vec<UserId>,
    /// Students the supervisor held before the write.
    pub previous_count: u32,
    /// Students the supervisor holds after the write.
    pub resulting_count: u32,
    pub capacity: u32,
}

impl AssignmentPlan {
    /// Check `request` against the loaded state.
    ///
    /// `students` holds whatever rows exist for the requested ids, in any
    /// order. `current_count` is the supervisor's student count before the
    /// write. Every requested student counts against capacity, including
    /// ones already held by this supervisor.
    pub fn build(
        request: &AssignmentRequest,
        supervisor: Option<&User>,
        students: &[User],
        current_count: u32,
        capacity: u32,
    ) -> Result<Self, AppError> {
        if request.is_empty() {
            return Err(AppError::validation("Please select at least one student."));
        }

        let supervisor = supervisor
            .ok_or_else(|| AppError::not_found("Supervisor not found"))?
            .as_supervisor()
            .ok_or_else(|| AppError::invalid_supervisor("Invalid supervisor selected."))?;

        if let Some(scope) = request.department_scope {
            if supervisor.department_id() != Some(scope) {
                return Err(AppError::invalid_supervisor(format!(
                    "Supervisor {} does not belong to this department.",
                    supervisor.name()
                )));
            }
        }

        let mut resolved = Vec::with_capacity(request.len());
        for id in &request.student_ids {
            let user = students
                .iter()
                .find(|u| u.id == *id)
                .ok_or_else(|| AppError::not_found(format!("Student {id} not found")))?;
            let student = user
                .as_student()
                .ok_or_else(|| AppError::validation(format!("User {} is not a student", user.name)))?;
            check_department(&student, &supervisor, request.department_scope)?;
            resolved.push(student);
        }

        let requested = resolved.len() as u32;
        let available = capacity.saturating_sub(current_count);
        if requested > available {
            let message = if available == 0 {
                format!("Supervisor already has maximum students ({current_count}/{capacity}).")
            } else {
                format!(
                    "Supervisor can only take {available} more students (currently has {current_count}/{capacity})"
                )
            };
            return Err(AppError::capacity_exceeded(message));
        }

        let already_held = resolved
            .iter()
            .filter(|s| s.is_supervised_by(supervisor.id()))
            .count() as u32;

        Ok(Self {
            supervisor_id: supervisor.id(),
            student_ids: resolved.iter().map(Student::id).collect(),
            previous_count: current_count,
            resulting_count: current_count + requested - already_held,
            capacity,
        })
    }
}

fn check_department(
    student: &Student<'_>,
    supervisor: &Supervisor<'_>,
    scope: Option<DepartmentId>,
) -> Result<(), AppError> {
    if let Some(scope) = scope {
        if student.department_id() != Some(scope) {
            return Err(AppError::validation(format!(
                "Student {} does not belong to this department.",
                student.user().name
            )));
        }
    }
    if student.department_id() != supervisor.department_id() {
        return Err(AppError::invalid_supervisor(format!(
            "Supervisor {} is not in the same department as student {}.",
            supervisor.name(),
            student.user().name
        )));
    }
    Ok(())
}
