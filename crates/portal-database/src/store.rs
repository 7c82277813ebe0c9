//! Store traits implemented by every persistence backend.
//!
//! The services only see these traits. [`crate::repositories`] implements
//! them over PostgreSQL and [`crate::MemoryStore`] over a single mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use portal_core::result::AppResult;
use portal_core::types::{DepartmentId, PageRequest, PageResponse, UserId};
use portal_entity::assignment::{AssignmentPlan, AssignmentRequest};
use portal_entity::department::{
    CreateDepartment, Department, DepartmentFilter, DepartmentMembers, DepartmentStats,
    DepartmentSummary, UpdateDepartment,
};
use portal_entity::user::{
    AccountCounts, AccountFilter, NewUser, StudentFilter, SupervisorListFilter, User, UserStatus,
};

use crate::memory::MemoryStore;
use crate::repositories::{AssignmentRepository, DepartmentRepository, UserRepository};

/// Department persistence.
#[async_trait]
pub trait DepartmentStore: Send + Sync + 'static {
    async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>>;

    /// Case-insensitive name lookup.
    async fn find_department_by_name(&self, name: &str) -> AppResult<Option<Department>>;

    /// Insert a department. A duplicate name is a validation error.
    async fn create_department(&self, input: &CreateDepartment) -> AppResult<Department>;

    /// Replace a department's fields.
    async fn update_department(
        &self,
        id: DepartmentId,
        input: &UpdateDepartment,
    ) -> AppResult<Department>;

    /// Flip the active flag and return the updated row.
    async fn toggle_department(&self, id: DepartmentId) -> AppResult<Department>;

    /// Delete a department that has no users, atomically with the check.
    async fn delete_department(&self, id: DepartmentId) -> AppResult<Department>;

    /// Departments with member counts, newest first.
    async fn list_departments(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DepartmentSummary>>;

    /// Active departments ordered by name.
    async fn active_departments(&self) -> AppResult<Vec<Department>>;

    async fn department_stats(&self) -> AppResult<DepartmentStats>;

    async fn department_members(&self, id: DepartmentId) -> AppResult<DepartmentMembers>;
}

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Case-insensitive email lookup.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert an account. A duplicate email is a validation error.
    async fn create_user(&self, input: NewUser) -> AppResult<User>;

    async fn set_user_status(&self, id: UserId, status: UserStatus) -> AppResult<User>;

    /// Hard delete. Students of a deleted supervisor lose their supervisor.
    async fn delete_user(&self, id: UserId) -> AppResult<User>;

    /// Accounts matching `filter`, newest first.
    async fn list_accounts(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>>;

    /// Students matching `filter`, newest first.
    async fn list_students(
        &self,
        filter: &StudentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>>;

    /// Ids of every student matching `filter`, unpaginated.
    async fn student_ids(&self, filter: &StudentFilter) -> AppResult<Vec<UserId>>;

    /// Supervisors matching `filter`, newest first.
    async fn list_supervisors(
        &self,
        filter: &SupervisorListFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>>;

    async fn account_counts(&self) -> AppResult<AccountCounts>;
}

/// Student to supervisor bookkeeping.
#[async_trait]
pub trait AssignmentStore: Send + Sync + 'static {
    /// Check `request` with [`AssignmentPlan::build`] and apply it, as one
    /// atomic unit. Nothing changes when the plan is rejected.
    async fn assign(&self, request: &AssignmentRequest, capacity: u32)
    -> AppResult<AssignmentPlan>;

    /// Clear a student's supervisor. When `scope` is set the student must
    /// belong to that department.
    async fn unassign(&self, student_id: UserId, scope: Option<DepartmentId>) -> AppResult<User>;

    /// Live count of students referencing `supervisor_id`.
    async fn student_count(&self, supervisor_id: UserId) -> AppResult<u32>;

    /// Live counts for several supervisors. Missing ids count zero.
    async fn student_counts(&self, supervisor_ids: &[UserId]) -> AppResult<HashMap<UserId, u32>>;

    /// Live count of every supervisor, optionally within one department.
    async fn supervisor_counts(&self, department_id: Option<DepartmentId>) -> AppResult<Vec<u32>>;

    /// Students of `supervisor_id`, ordered by name.
    async fn students_of(&self, supervisor_id: UserId) -> AppResult<Vec<User>>;
}

/// One backend seen through all three store traits.
#[derive(Clone)]
pub struct Stores {
    pub departments: Arc<dyn DepartmentStore>,
    pub users: Arc<dyn UserStore>,
    pub assignments: Arc<dyn AssignmentStore>,
}

impl Stores {
    /// PostgreSQL repositories over one pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            departments: Arc::new(DepartmentRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            assignments: Arc::new(AssignmentRepository::new(pool)),
        }
    }

    /// A single in-memory store behind every trait.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            departments: store.clone(),
            users: store.clone(),
            assignments: store,
        }
    }
}
