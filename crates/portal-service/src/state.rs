//! Shared application state: every service wired over one set of stores.

use std::sync::Arc;

use portal_core::config::AppConfig;
use portal_core::error::AppError;
use portal_database::Stores;
use portal_entity::user::EmailPolicy;

use crate::account::AccountService;
use crate::assignment::AssignmentService;
use crate::dashboard::DashboardService;
use crate::department::DepartmentService;
use crate::registration::RegistrationService;
use crate::seed::SeedService;

/// Application state containing all services.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    pub stores: Stores,

    // ── Services ─────────────────────────────────────────────
    pub assignments: Arc<AssignmentService>,
    pub accounts: Arc<AccountService>,
    pub departments: Arc<DepartmentService>,
    pub registration: Arc<RegistrationService>,
    pub dashboards: Arc<DashboardService>,
    pub seeder: Arc<SeedService>,
}

impl AppState {
    /// Build every service over `stores`.
    pub fn new(config: AppConfig, stores: Stores) -> Result<Self, AppError> {
        let capacity = config.assignment.max_students_per_supervisor;
        if capacity == 0 {
            return Err(AppError::configuration(
                "assignment.max_students_per_supervisor must be at least 1",
            ));
        }
        let policy = EmailPolicy::new(&config.registration.email_domain)?;
        let pagination = config.pagination.clone();

        Ok(Self {
            assignments: Arc::new(AssignmentService::new(
                stores.users.clone(),
                stores.assignments.clone(),
                capacity,
                pagination.clone(),
            )),
            accounts: Arc::new(AccountService::new(stores.users.clone(), pagination.clone())),
            departments: Arc::new(DepartmentService::new(
                stores.departments.clone(),
                pagination,
            )),
            registration: Arc::new(RegistrationService::new(
                stores.users.clone(),
                stores.departments.clone(),
                policy,
            )),
            dashboards: Arc::new(DashboardService::new(
                stores.users.clone(),
                stores.departments.clone(),
                stores.assignments.clone(),
                capacity,
            )),
            seeder: Arc::new(SeedService::new(
                stores.departments.clone(),
                stores.users.clone(),
            )),
            config: Arc::new(config),
            stores,
        })
    }
}
