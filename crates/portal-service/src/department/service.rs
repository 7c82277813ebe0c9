//! Department service: validated create/update, status toggling, guarded
//! deletion and the department listings.

use std::sync::Arc;

use tracing::{info, warn};

use portal_core::config::PaginationConfig;
use portal_core::error::AppError;
use portal_core::traits::Service;
use portal_core::types::{DepartmentId, PageRequest, PageResponse};
use portal_database::DepartmentStore;
use portal_entity::department::{
    CreateDepartment, Department, DepartmentFilter, DepartmentOverview, DepartmentStats,
    DepartmentSummary, UpdateDepartment,
};
use portal_entity::validation::validate_input;

use crate::context::ActorContext;

/// Handles department operations.
#[derive(Clone)]
pub struct DepartmentService {
    departments: Arc<dyn DepartmentStore>,
    pagination: PaginationConfig,
}

impl Service for DepartmentService {}

impl DepartmentService {
    pub fn new(departments: Arc<dyn DepartmentStore>, pagination: PaginationConfig) -> Self {
        Self {
            departments,
            pagination,
        }
    }

    pub async fn create_department(
        &self,
        ctx: &ActorContext,
        input: CreateDepartment,
    ) -> Result<Department, AppError> {
        ctx.require_superadmin()?;
        let input = CreateDepartment::new(&input.name, input.description.as_deref(), input.is_active);
        validate_input(&input)?;

        let department = self.departments.create_department(&input).await?;
        info!(
            admin_id = %ctx.user_id,
            department_id = %department.id,
            name = %department.name,
            "Department created"
        );
        Ok(department)
    }

    pub async fn update_department(
        &self,
        ctx: &ActorContext,
        id: DepartmentId,
        input: UpdateDepartment,
    ) -> Result<Department, AppError> {
        ctx.require_superadmin()?;
        let input = UpdateDepartment::new(&input.name, input.description.as_deref(), input.is_active);
        validate_input(&input)?;

        let department = self.departments.update_department(id, &input).await?;
        info!(
            admin_id = %ctx.user_id,
            department_id = %id,
            name = %department.name,
            is_active = department.is_active,
            "Department updated"
        );
        Ok(department)
    }

    /// Flip a department between active and inactive.
    pub async fn toggle_department_status(
        &self,
        ctx: &ActorContext,
        id: DepartmentId,
    ) -> Result<Department, AppError> {
        ctx.require_superadmin()?;
        let department = self.departments.toggle_department(id).await?;
        info!(
            admin_id = %ctx.user_id,
            department_id = %id,
            is_active = department.is_active,
            "Department status toggled"
        );
        Ok(department)
    }

    /// Delete a department. Fails while any account belongs to it.
    pub async fn delete_department(
        &self,
        ctx: &ActorContext,
        id: DepartmentId,
    ) -> Result<Department, AppError> {
        ctx.require_superadmin()?;
        match self.departments.delete_department(id).await {
            Ok(department) => {
                info!(
                    admin_id = %ctx.user_id,
                    department_id = %id,
                    name = %department.name,
                    "Department deleted"
                );
                Ok(department)
            }
            Err(e) => {
                warn!(admin_id = %ctx.user_id, department_id = %id, kind = %e.kind, "Department not deleted");
                Err(e)
            }
        }
    }

    pub async fn get_department(
        &self,
        ctx: &ActorContext,
        id: DepartmentId,
    ) -> Result<Department, AppError> {
        ctx.require_superadmin()?;
        self.find(id).await
    }

    /// Departments with student and supervisor counts, newest first.
    pub async fn list_departments(
        &self,
        ctx: &ActorContext,
        filter: &DepartmentFilter,
        page: PageRequest,
    ) -> Result<PageResponse<DepartmentSummary>, AppError> {
        ctx.require_superadmin()?;
        let page = PageRequest::new(
            page.page,
            page.page_size.min(self.pagination.max_page_size),
        );
        self.departments.list_departments(filter, &page).await
    }

    pub async fn department_stats(&self, ctx: &ActorContext) -> Result<DepartmentStats, AppError> {
        ctx.require_superadmin()?;
        self.departments.department_stats().await
    }

    /// A department with its member counts.
    pub async fn department_overview(
        &self,
        ctx: &ActorContext,
        id: DepartmentId,
    ) -> Result<DepartmentOverview, AppError> {
        ctx.require_superadmin()?;
        let department = self.find(id).await?;
        let members = self.departments.department_members(id).await?;
        Ok(DepartmentOverview {
            department,
            members,
        })
    }

    /// Active departments by name, as offered at registration. No actor
    /// is required.
    pub async fn active_departments(&self) -> Result<Vec<Department>, AppError> {
        self.departments.active_departments().await
    }

    async fn find(&self, id: DepartmentId) -> Result<Department, AppError> {
        self.departments
            .find_department(id)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found"))
    }
}
