//! In-memory store guarded by a single Tokio mutex.
//!
//! Every operation, including the assignment check and write, runs under
//! the one lock, which makes it suitable for tests and single-process runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::{DepartmentId, PageRequest, PageResponse, UserId};
use portal_entity::assignment::{AssignmentPlan, AssignmentRequest};
use portal_entity::department::{
    CreateDepartment, Department, DepartmentFilter, DepartmentMembers, DepartmentStats,
    DepartmentSummary, UpdateDepartment,
};
use portal_entity::user::{
    AccountCounts, AccountFilter, NewUser, StudentFilter, SupervisorListFilter, User, UserRole,
    UserStatus,
};

use crate::store::{AssignmentStore, DepartmentStore, UserStore};

/// Rows kept in insertion order.
#[derive(Debug, Default)]
struct InnerState {
    departments: Vec<Department>,
    users: Vec<User>,
}

impl InnerState {
    fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    fn department_mut(&mut self, id: DepartmentId) -> AppResult<&mut Department> {
        self.departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Department not found"))
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn user_mut(&mut self, id: UserId) -> AppResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    fn name_taken(&self, name: &str, except: Option<DepartmentId>) -> bool {
        let name = name.to_lowercase();
        self.departments
            .iter()
            .any(|d| Some(d.id) != except && d.name.to_lowercase() == name)
    }

    fn count_students_of(&self, supervisor_id: UserId) -> u32 {
        self.users
            .iter()
            .filter(|u| u.is_student() && u.supervisor_id == Some(supervisor_id))
            .count() as u32
    }

    fn count_in_department(&self, id: DepartmentId, role: UserRole) -> i64 {
        self.users
            .iter()
            .filter(|u| u.role == role && u.department_id == Some(id))
            .count() as i64
    }

    /// Users matching `pred`, newest first. Ties keep the later insert first.
    fn newest_first(&self, pred: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().rev().filter(|u| pred(*u)).cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_department(name: &str) -> AppError {
    AppError::validation(format!("The department name '{name}' has already been taken."))
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>> {
        Ok(self.state.lock().await.department(id).cloned())
    }

    async fn find_department_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let name = name.trim().to_lowercase();
        Ok(self
            .state
            .lock()
            .await
            .departments
            .iter()
            .find(|d| d.name.to_lowercase() == name)
            .cloned())
    }

    async fn create_department(&self, input: &CreateDepartment) -> AppResult<Department> {
        let mut state = self.state.lock().await;
        if state.name_taken(&input.name, None) {
            return Err(duplicate_department(&input.name));
        }
        let now = Utc::now();
        let department = Department {
            id: DepartmentId::new(),
            name: input.name.clone(),
            description: input.description.clone(),
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        state.departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        input: &UpdateDepartment,
    ) -> AppResult<Department> {
        let mut state = self.state.lock().await;
        if state.department(id).is_none() {
            return Err(AppError::not_found("Department not found"));
        }
        if state.name_taken(&input.name, Some(id)) {
            return Err(duplicate_department(&input.name));
        }
        let department = state.department_mut(id)?;
        department.name = input.name.clone();
        department.description = input.description.clone();
        department.is_active = input.is_active;
        department.updated_at = Utc::now();
        Ok(department.clone())
    }

    async fn toggle_department(&self, id: DepartmentId) -> AppResult<Department> {
        let mut state = self.state.lock().await;
        let department = state.department_mut(id)?;
        department.is_active = !department.is_active;
        department.updated_at = Utc::now();
        Ok(department.clone())
    }

    async fn delete_department(&self, id: DepartmentId) -> AppResult<Department> {
        let mut state = self.state.lock().await;
        let position = state
            .departments
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("Department not found"))?;
        let members = state
            .users
            .iter()
            .filter(|u| u.department_id == Some(id))
            .count();
        if members > 0 {
            warn!(department_id = %id, members, "Refusing to delete non-empty department");
            return Err(AppError::department_not_empty(
                "Cannot delete department with assigned users!",
            ));
        }
        Ok(state.departments.remove(position))
    }

    async fn list_departments(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DepartmentSummary>> {
        let state = self.state.lock().await;
        let mut departments: Vec<&Department> = state
            .departments
            .iter()
            .rev()
            .filter(|d| filter.matches(*d))
            .collect();
        departments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let summaries = departments
            .into_iter()
            .map(|d| DepartmentSummary {
                department: d.clone(),
                student_count: state.count_in_department(d.id, UserRole::Student),
                supervisor_count: state.count_in_department(d.id, UserRole::Supervisor),
            })
            .collect();
        Ok(PageResponse::from_vec(summaries, page))
    }

    async fn active_departments(&self) -> AppResult<Vec<Department>> {
        let state = self.state.lock().await;
        let mut departments: Vec<Department> = state
            .departments
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn department_stats(&self) -> AppResult<DepartmentStats> {
        let state = self.state.lock().await;
        let total = state.departments.len() as i64;
        let active = state.departments.iter().filter(|d| d.is_active).count() as i64;
        Ok(DepartmentStats {
            total,
            active,
            inactive: total - active,
        })
    }

    async fn department_members(&self, id: DepartmentId) -> AppResult<DepartmentMembers> {
        let state = self.state.lock().await;
        let unassigned_students = state
            .users
            .iter()
            .filter(|u| u.is_student() && u.department_id == Some(id) && u.supervisor_id.is_none())
            .count() as i64;
        Ok(DepartmentMembers {
            total_students: state.count_in_department(id, UserRole::Student),
            total_supervisors: state.count_in_department(id, UserRole::Supervisor),
            unassigned_students,
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let email = input.email.to_lowercase();
        if state.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(AppError::validation(format!(
                "The email '{}' has already been taken.",
                input.email
            )));
        }
        if let Some(dept) = input.department_id {
            if state.department(dept).is_none() {
                return Err(AppError::validation("The selected department is invalid."));
            }
        }
        let user = input.into_user(Utc::now());
        state.users.push(user.clone());
        Ok(user)
    }

    async fn set_user_status(&self, id: UserId, status: UserStatus) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state.user_mut(id)?;
        user.status = status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let position = state
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let removed = state.users.remove(position);
        let now = Utc::now();
        for user in state.users.iter_mut().filter(|u| u.supervisor_id == Some(id)) {
            user.supervisor_id = None;
            user.updated_at = now;
        }
        Ok(removed)
    }

    async fn list_accounts(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let state = self.state.lock().await;
        Ok(PageResponse::from_vec(
            state.newest_first(|u| filter.matches(u)),
            page,
        ))
    }

    async fn list_students(
        &self,
        filter: &StudentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let state = self.state.lock().await;
        Ok(PageResponse::from_vec(
            state.newest_first(|u| filter.matches(u)),
            page,
        ))
    }

    async fn student_ids(&self, filter: &StudentFilter) -> AppResult<Vec<UserId>> {
        let state = self.state.lock().await;
        Ok(state
            .newest_first(|u| filter.matches(u))
            .into_iter()
            .map(|u| u.id)
            .collect())
    }

    async fn list_supervisors(
        &self,
        filter: &SupervisorListFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let state = self.state.lock().await;
        Ok(PageResponse::from_vec(
            state.newest_first(|u| {
                filter.matches(u) && filter.has_room(state.count_students_of(u.id))
            }),
            page,
        ))
    }

    async fn account_counts(&self) -> AppResult<AccountCounts> {
        let state = self.state.lock().await;
        let mut counts = AccountCounts::default();
        for user in &state.users {
            match user.role {
                UserRole::Student => {
                    counts.students += 1;
                    if user.supervisor_id.is_none() {
                        counts.unassigned_students += 1;
                    }
                }
                UserRole::Supervisor => counts.supervisors += 1,
                UserRole::Superadmin => counts.superadmins += 1,
            }
            if !user.is_active() {
                counts.paused += 1;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn assign(
        &self,
        request: &AssignmentRequest,
        capacity: u32,
    ) -> AppResult<AssignmentPlan> {
        let mut state = self.state.lock().await;

        let supervisor = state.user(request.supervisor_id).cloned();
        let students: Vec<User> = state
            .users
            .iter()
            .filter(|u| request.student_ids.contains(&u.id))
            .cloned()
            .collect();
        let current = state.count_students_of(request.supervisor_id);

        let plan = AssignmentPlan::build(request, supervisor.as_ref(), &students, current, capacity)?;

        let now = Utc::now();
        for user in state
            .users
            .iter_mut()
            .filter(|u| plan.student_ids.contains(&u.id))
        {
            user.supervisor_id = Some(plan.supervisor_id);
            user.updated_at = now;
        }

        info!(
            supervisor_id = %plan.supervisor_id,
            assigned = plan.student_ids.len(),
            count = plan.resulting_count,
            capacity,
            "Students assigned in memory store"
        );
        Ok(plan)
    }

    async fn unassign(&self, student_id: UserId, scope: Option<DepartmentId>) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let student = state
            .users
            .iter_mut()
            .find(|u| {
                u.id == student_id
                    && u.is_student()
                    && scope.is_none_or(|dept| u.department_id == Some(dept))
            })
            .ok_or_else(|| AppError::not_found("Student not found"))?;
        if student.supervisor_id.take().is_some() {
            student.updated_at = Utc::now();
        }
        Ok(student.clone())
    }

    async fn student_count(&self, supervisor_id: UserId) -> AppResult<u32> {
        Ok(self.state.lock().await.count_students_of(supervisor_id))
    }

    async fn student_counts(&self, supervisor_ids: &[UserId]) -> AppResult<HashMap<UserId, u32>> {
        let state = self.state.lock().await;
        Ok(supervisor_ids
            .iter()
            .map(|id| (*id, state.count_students_of(*id)))
            .collect())
    }

    async fn supervisor_counts(&self, department_id: Option<DepartmentId>) -> AppResult<Vec<u32>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .filter(|u| {
                u.is_supervisor() && department_id.is_none_or(|dept| u.department_id == Some(dept))
            })
            .map(|u| state.count_students_of(u.id))
            .collect())
    }

    async fn students_of(&self, supervisor_id: UserId) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut students: Vec<User> = state
            .users
            .iter()
            .filter(|u| u.is_student() && u.supervisor_id == Some(supervisor_id))
            .cloned()
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }
}
