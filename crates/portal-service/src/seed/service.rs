//! Seed service: creates the demo departments and accounts, skipping
//! anything that already exists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use portal_core::error::AppError;
use portal_core::traits::Service;
use portal_core::types::DepartmentId;
use portal_database::{DepartmentStore, UserStore};
use portal_entity::department::CreateDepartment;
use portal_entity::user::{NewUser, UserRole, UserStatus};

use super::data::{DEPARTMENTS, DepartmentSeed, student_local_part};

/// A disabled credential; accounts seeded with it cannot sign in.
pub const DISABLED_CREDENTIAL: &str = "!";

/// Superadmin account to create alongside the demo data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperadminSeed {
    pub name: String,
    pub email: String,
}

/// Seeding options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOptions {
    /// Credential hash given to every seeded account.
    pub credential_hash: String,
    /// Domain of seeded email addresses.
    pub email_domain: String,
    pub superadmin: Option<SuperadminSeed>,
}

impl SeedOptions {
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            credential_hash: DISABLED_CREDENTIAL.to_string(),
            email_domain: email_domain.into(),
            superadmin: None,
        }
    }
}

/// What a seed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub departments_created: u32,
    pub supervisors_created: u32,
    pub students_created: u32,
    pub superadmins_created: u32,
    pub skipped: u32,
}

/// Creates demo data.
#[derive(Clone)]
pub struct SeedService {
    departments: Arc<dyn DepartmentStore>,
    users: Arc<dyn UserStore>,
}

impl Service for SeedService {}

impl SeedService {
    pub fn new(departments: Arc<dyn DepartmentStore>, users: Arc<dyn UserStore>) -> Self {
        Self { departments, users }
    }

    /// Seed everything. Running twice creates nothing the second time.
    pub async fn seed(&self, options: &SeedOptions) -> Result<SeedReport, AppError> {
        if options.credential_hash.is_empty() {
            return Err(AppError::validation("Seed credential hash may not be empty"));
        }

        let mut report = SeedReport::default();

        if let Some(admin) = &options.superadmin {
            let created = self
                .seed_user(&options.credential_hash, NewUserSpec {
                    name: &admin.name,
                    email: admin.email.clone(),
                    matric_no: None,
                    role: UserRole::Superadmin,
                    department_id: None,
                })
                .await?;
            if created {
                report.superadmins_created += 1;
            } else {
                report.skipped += 1;
            }
        }

        for seed in DEPARTMENTS {
            self.seed_department(seed, options, &mut report).await?;
        }

        info!(
            departments = report.departments_created,
            supervisors = report.supervisors_created,
            students = report.students_created,
            skipped = report.skipped,
            "Seeding completed"
        );
        Ok(report)
    }

    async fn seed_department(
        &self,
        seed: &DepartmentSeed,
        options: &SeedOptions,
        report: &mut SeedReport,
    ) -> Result<(), AppError> {
        let department = match self.departments.find_department_by_name(seed.name).await? {
            Some(existing) => {
                report.skipped += 1;
                existing
            }
            None => {
                report.departments_created += 1;
                self.departments
                    .create_department(&CreateDepartment::new(
                        seed.name,
                        Some(seed.description),
                        true,
                    ))
                    .await?
            }
        };
        info!(department = %department.name, "Processing department");

        for (name, local) in seed.supervisors {
            let created = self
                .seed_user(&options.credential_hash, NewUserSpec {
                    name: *name,
                    email: format!("{local}@{}", options.email_domain),
                    matric_no: None,
                    role: UserRole::Supervisor,
                    department_id: Some(department.id),
                })
                .await?;
            if created {
                report.supervisors_created += 1;
            } else {
                report.skipped += 1;
            }
        }

        for (name, matric) in seed.students {
            let created = self
                .seed_user(&options.credential_hash, NewUserSpec {
                    name: *name,
                    email: format!("{}@{}", student_local_part(name), options.email_domain),
                    matric_no: Some(*matric),
                    role: UserRole::Student,
                    department_id: Some(department.id),
                })
                .await?;
            if created {
                report.students_created += 1;
            } else {
                report.skipped += 1;
            }
        }
        Ok(())
    }

    /// Create one account unless its email exists. Returns whether it was created.
    async fn seed_user(&self, credential_hash: &str, spec: NewUserSpec<'_>) -> Result<bool, AppError> {
        if self.users.find_user_by_email(&spec.email).await?.is_some() {
            warn!(email = %spec.email, role = %spec.role, "Account already exists, skipping");
            return Ok(false);
        }
        self.users
            .create_user(NewUser {
                name: spec.name.to_string(),
                email: spec.email,
                credential_hash: credential_hash.to_string(),
                matric_no: spec.matric_no.map(str::to_string),
                role: spec.role,
                status: UserStatus::Active,
                department_id: spec.department_id,
                supervisor_id: None,
            })
            .await?;
        Ok(true)
    }
}

struct NewUserSpec<'a> {
    name: &'a str,
    email: String,
    matric_no: Option<&'a str>,
    role: UserRole,
    department_id: Option<DepartmentId>,
}
