//! Registration service.
//!
//! Credentials arrive already hashed from the identity collaborator; this
//! service checks the role-specific email format, the department and
//! uniqueness, then creates an active account with no supervisor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use portal_core::error::AppError;
use portal_core::traits::Service;
use portal_core::types::DepartmentId;
use portal_database::{DepartmentStore, UserStore};
use portal_entity::user::{EmailPolicy, NewUser, User, UserRole, UserStatus};
use portal_entity::validation::validate_input;

/// Registration form data.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterAccount {
    #[validate(length(min = 1, max = 255, message = "Name is required and may not exceed 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Email is required and may not exceed 255 characters"))]
    pub email: String,
    #[validate(length(min = 1, message = "A credential is required"))]
    pub credential_hash: String,
    pub department_id: DepartmentId,
}

impl RegisterAccount {
    pub fn new(
        name: &str,
        email: &str,
        credential_hash: impl Into<String>,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            credential_hash: credential_hash.into(),
            department_id,
        }
    }
}

/// Creates student and supervisor accounts.
#[derive(Clone)]
pub struct RegistrationService {
    users: Arc<dyn UserStore>,
    departments: Arc<dyn DepartmentStore>,
    policy: EmailPolicy,
}

impl Service for RegistrationService {}

impl RegistrationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        departments: Arc<dyn DepartmentStore>,
        policy: EmailPolicy,
    ) -> Self {
        Self {
            users,
            departments,
            policy,
        }
    }

    /// Register a student. The matric number is taken from the email.
    pub async fn register_student(&self, form: RegisterAccount) -> Result<User, AppError> {
        let form = RegisterAccount::new(&form.name, &form.email, form.credential_hash, form.department_id);
        validate_input(&form)?;
        let matric_no = self.policy.student_matric_no(&form.email)?;
        self.create(form, UserRole::Student, Some(matric_no)).await
    }

    /// Register a supervisor.
    pub async fn register_supervisor(&self, form: RegisterAccount) -> Result<User, AppError> {
        let form = RegisterAccount::new(&form.name, &form.email, form.credential_hash, form.department_id);
        validate_input(&form)?;
        self.policy.check_supervisor(&form.email)?;
        self.create(form, UserRole::Supervisor, None).await
    }

    async fn create(
        &self,
        form: RegisterAccount,
        role: UserRole,
        matric_no: Option<String>,
    ) -> Result<User, AppError> {
        let department = self
            .departments
            .find_department(form.department_id)
            .await?
            .filter(|d| d.is_active)
            .ok_or_else(|| AppError::validation("The selected department is invalid."))?;

        if self.users.find_user_by_email(&form.email).await?.is_some() {
            return Err(AppError::validation(format!(
                "The email '{}' has already been taken.",
                form.email
            )));
        }

        let user = self
            .users
            .create_user(NewUser {
                name: form.name,
                email: form.email,
                credential_hash: form.credential_hash,
                matric_no,
                role,
                status: UserStatus::Active,
                department_id: Some(department.id),
                supervisor_id: None,
            })
            .await?;

        info!(
            user_id = %user.id,
            role = %user.role,
            department_id = %department.id,
            "Account registered"
        );
        Ok(user)
    }
}
