//! Dashboard service: one summary per role.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portal_core::error::AppError;
use portal_core::traits::Service;
use portal_database::{AssignmentStore, DepartmentStore, UserStore};
use portal_entity::assignment::{SupervisorLoad, SupervisorLoadStats};
use portal_entity::department::{Department, DepartmentStats};
use portal_entity::user::{AccountCounts, Member, User};

use crate::context::ActorContext;

/// What a student sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDashboard {
    pub profile: User,
    pub department: Option<Department>,
    pub supervisor: Option<User>,
}

/// What a supervisor sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorDashboard {
    pub load: SupervisorLoad,
    pub department: Option<Department>,
    pub students: Vec<User>,
}

/// What a superadmin sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperadminDashboard {
    pub profile: User,
    pub accounts: AccountCounts,
    pub departments: DepartmentStats,
    pub supervisors: SupervisorLoadStats,
}

/// A dashboard tagged with the role it was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Student(StudentDashboard),
    Supervisor(SupervisorDashboard),
    Superadmin(SuperadminDashboard),
}

/// Builds dashboards.
#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserStore>,
    departments: Arc<dyn DepartmentStore>,
    assignments: Arc<dyn AssignmentStore>,
    capacity: u32,
}

impl Service for DashboardService {}

impl DashboardService {
    pub fn new(
        users: Arc<dyn UserStore>,
        departments: Arc<dyn DepartmentStore>,
        assignments: Arc<dyn AssignmentStore>,
        capacity: u32,
    ) -> Self {
        Self {
            users,
            departments,
            assignments,
            capacity,
        }
    }

    /// The actor's dashboard. Paused accounts are refused.
    pub async fn dashboard(&self, ctx: &ActorContext) -> Result<Dashboard, AppError> {
        let user = self
            .users
            .find_user(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.is_active() {
            return Err(AppError::authorization(
                "Your account has been paused. Please contact the administrator.",
            ));
        }

        let department = match user.department_id {
            Some(id) => self.departments.find_department(id).await?,
            None => None,
        };

        match user.member() {
            Member::Student(student) => {
                let supervisor = match student.supervisor_id() {
                    Some(id) => self.users.find_user(id).await?,
                    None => None,
                };
                Ok(Dashboard::Student(StudentDashboard {
                    profile: user.clone(),
                    department,
                    supervisor,
                }))
            }
            Member::Supervisor(supervisor) => {
                let students = self.assignments.students_of(supervisor.id()).await?;
                let load = SupervisorLoad::new(
                    user.clone(),
                    students.len() as u32,
                    self.capacity,
                );
                Ok(Dashboard::Supervisor(SupervisorDashboard {
                    load,
                    department,
                    students,
                }))
            }
            Member::Superadmin(_) => Ok(Dashboard::Superadmin(SuperadminDashboard {
                profile: user.clone(),
                accounts: self.users.account_counts().await?,
                departments: self.departments.department_stats().await?,
                supervisors: SupervisorLoadStats::from_counts(
                    self.assignments.supervisor_counts(None).await?,
                    self.capacity,
                ),
            })),
        }
    }
}
