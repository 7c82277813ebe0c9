//! Assignment service: capacity-checked assignment, unassignment and the
//! student/supervisor listings the assignment screens are built from.

use std::sync::Arc;

use tracing::{info, warn};

use portal_core::config::PaginationConfig;
use portal_core::error::AppError;
use portal_core::traits::Service;
use portal_core::types::{DepartmentId, PageRequest, PageResponse, UserId};
use portal_database::{AssignmentStore, UserStore};
use portal_entity::assignment::{
    AssignmentPlan, AssignmentRequest, SupervisorLoad, SupervisorLoadStats,
};
use portal_entity::user::{StudentFilter, SupervisorListFilter, User};

use crate::context::ActorContext;

/// Owns the student to supervisor relationship.
#[derive(Clone)]
pub struct AssignmentService {
    users: Arc<dyn UserStore>,
    assignments: Arc<dyn AssignmentStore>,
    capacity: u32,
    pagination: PaginationConfig,
}

impl Service for AssignmentService {}

impl AssignmentService {
    pub fn new(
        users: Arc<dyn UserStore>,
        assignments: Arc<dyn AssignmentStore>,
        capacity: u32,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            users,
            assignments,
            capacity,
            pagination,
        }
    }

    /// Maximum students per supervisor.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Assign one student, replacing any previous supervisor.
    pub async fn assign_student(
        &self,
        ctx: &ActorContext,
        student_id: UserId,
        supervisor_id: UserId,
    ) -> Result<AssignmentPlan, AppError> {
        ctx.require_superadmin()?;
        self.apply(ctx, AssignmentRequest::single(student_id, supervisor_id))
            .await
    }

    /// Assign a set of students all-or-nothing. When `scope` is given every
    /// party must belong to that department.
    pub async fn bulk_assign(
        &self,
        ctx: &ActorContext,
        student_ids: impl IntoIterator<Item = UserId>,
        supervisor_id: UserId,
        scope: Option<DepartmentId>,
    ) -> Result<AssignmentPlan, AppError> {
        ctx.require_superadmin()?;
        let mut request = AssignmentRequest::bulk(student_ids, supervisor_id)?;
        if let Some(department_id) = scope {
            request = request.scoped_to(department_id);
        }
        self.apply(ctx, request).await
    }

    async fn apply(
        &self,
        ctx: &ActorContext,
        request: AssignmentRequest,
    ) -> Result<AssignmentPlan, AppError> {
        match self.assignments.assign(&request, self.capacity).await {
            Ok(plan) => {
                info!(
                    admin_id = %ctx.user_id,
                    supervisor_id = %plan.supervisor_id,
                    students = plan.student_ids.len(),
                    count = plan.resulting_count,
                    capacity = plan.capacity,
                    "Assigned supervisor to students"
                );
                Ok(plan)
            }
            Err(e) => {
                warn!(
                    admin_id = %ctx.user_id,
                    supervisor_id = %request.supervisor_id,
                    students = request.len(),
                    kind = %e.kind,
                    error = %e.message,
                    "Assignment rejected"
                );
                Err(e)
            }
        }
    }

    /// Clear a student's supervisor. Repeating the call is harmless.
    pub async fn unassign_student(
        &self,
        ctx: &ActorContext,
        student_id: UserId,
    ) -> Result<User, AppError> {
        ctx.require_superadmin()?;
        let student = self.assignments.unassign(student_id, None).await?;
        info!(admin_id = %ctx.user_id, student_id = %student_id, "Unassigned student");
        Ok(student)
    }

    /// Clear a student's supervisor from the department detail view. A
    /// student outside `department_id` is reported as not found.
    pub async fn remove_supervisor_from_student(
        &self,
        ctx: &ActorContext,
        department_id: DepartmentId,
        student_id: UserId,
    ) -> Result<User, AppError> {
        ctx.require_superadmin()?;
        let student = self
            .assignments
            .unassign(student_id, Some(department_id))
            .await?;
        info!(
            admin_id = %ctx.user_id,
            department_id = %department_id,
            student_id = %student_id,
            "Supervisor removed from student"
        );
        Ok(student)
    }

    /// Students matching `filter`, newest first.
    pub async fn list_students(
        &self,
        ctx: &ActorContext,
        filter: &StudentFilter,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        ctx.require_superadmin()?;
        self.users.list_students(filter, &self.clamp(page)).await
    }

    /// Supervisors matching `filter` with their current load, newest first.
    pub async fn list_supervisors(
        &self,
        ctx: &ActorContext,
        filter: &SupervisorListFilter,
        page: PageRequest,
    ) -> Result<PageResponse<SupervisorLoad>, AppError> {
        ctx.require_superadmin()?;
        let supervisors = self
            .users
            .list_supervisors(filter, &self.clamp(page))
            .await?;
        let ids: Vec<UserId> = supervisors.items.iter().map(|s| s.id).collect();
        let counts = self.assignments.student_counts(&ids).await?;
        let capacity = self.capacity;
        Ok(supervisors.map(|supervisor| {
            let assigned = counts.get(&supervisor.id).copied().unwrap_or(0);
            SupervisorLoad::new(supervisor, assigned, capacity)
        }))
    }

    /// Supervisors per load band, portal-wide or within one department.
    pub async fn supervisor_load_stats(
        &self,
        ctx: &ActorContext,
        department_id: Option<DepartmentId>,
    ) -> Result<SupervisorLoadStats, AppError> {
        ctx.require_superadmin()?;
        let counts = self.assignments.supervisor_counts(department_id).await?;
        Ok(SupervisorLoadStats::from_counts(counts, self.capacity))
    }

    /// Ids of every student matching `filter`, for "select all".
    pub async fn select_students(
        &self,
        ctx: &ActorContext,
        filter: &StudentFilter,
    ) -> Result<Vec<UserId>, AppError> {
        ctx.require_superadmin()?;
        self.users.student_ids(filter).await
    }

    /// Current load of one supervisor.
    pub async fn supervisor_load(
        &self,
        ctx: &ActorContext,
        supervisor_id: UserId,
    ) -> Result<SupervisorLoad, AppError> {
        ctx.require_self_or_superadmin(supervisor_id)?;
        let supervisor = self.find_supervisor(supervisor_id).await?;
        let assigned = self.assignments.student_count(supervisor_id).await?;
        Ok(SupervisorLoad::new(supervisor, assigned, self.capacity))
    }

    /// Students currently assigned to a supervisor, by name.
    pub async fn students_of(
        &self,
        ctx: &ActorContext,
        supervisor_id: UserId,
    ) -> Result<Vec<User>, AppError> {
        ctx.require_self_or_superadmin(supervisor_id)?;
        self.find_supervisor(supervisor_id).await?;
        self.assignments.students_of(supervisor_id).await
    }

    async fn find_supervisor(&self, supervisor_id: UserId) -> Result<User, AppError> {
        self.users
            .find_user(supervisor_id)
            .await?
            .filter(User::is_supervisor)
            .ok_or_else(|| AppError::not_found("Supervisor not found"))
    }

    fn clamp(&self, page: PageRequest) -> PageRequest {
        PageRequest::new(page.page, page.page_size.min(self.pagination.max_page_size))
    }
}
