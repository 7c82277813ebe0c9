//! Department repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::{DepartmentId, PageRequest, PageResponse};
use portal_entity::department::{
    CreateDepartment, Department, DepartmentFilter, DepartmentMembers, DepartmentStats,
    DepartmentSummary, UpdateDepartment,
};

use super::{db_error, violated_constraint};
use crate::store::DepartmentStore;

const NAME_CONSTRAINT: &str = "departments_name_key";
const USERS_FK_CONSTRAINT: &str = "users_department_id_fkey";

const SEARCH_CLAUSE: &str = "($1::text IS NULL OR d.name ILIKE $1 ESCAPE '\\' \
     OR d.description ILIKE $1 ESCAPE '\\')";

/// Repository for department CRUD and reporting queries.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(name: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        if violated_constraint(&e) == Some(NAME_CONSTRAINT) {
            AppError::validation(format!("The department name '{name}' has already been taken."))
        } else {
            db_error("Failed to write department")(e)
        }
    }
}

#[async_trait]
impl DepartmentStore for DepartmentRepository {
    async fn find_department(&self, id: DepartmentId) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find department by id"))
    }

    async fn find_department_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>(
            "SELECT * FROM departments WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find department by name"))
    }

    async fn create_department(&self, input: &CreateDepartment) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (id, name, description, is_active) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(DepartmentId::new())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error(&input.name))
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        input: &UpdateDepartment,
    ) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2, description = $3, is_active = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error(&input.name))?
        .ok_or_else(|| AppError::not_found("Department not found"))
    }

    async fn toggle_department(&self, id: DepartmentId) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            "UPDATE departments SET is_active = NOT is_active, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to toggle department status"))?
        .ok_or_else(|| AppError::not_found("Department not found"))
    }

    async fn delete_department(&self, id: DepartmentId) -> AppResult<Department> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let department =
            sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock department"))?
                .ok_or_else(|| AppError::not_found("Department not found"))?;

        let members: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE department_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("Failed to count department members"))?;

        if members > 0 {
            warn!(department_id = %id, members, "Refusing to delete non-empty department");
            return Err(AppError::department_not_empty(
                "Cannot delete department with assigned users!",
            ));
        }

        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if violated_constraint(&e) == Some(USERS_FK_CONSTRAINT) {
                    AppError::department_not_empty("Cannot delete department with assigned users!")
                } else {
                    db_error("Failed to delete department")(e)
                }
            })?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit department deletion"))?;
        Ok(department)
    }

    async fn list_departments(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DepartmentSummary>> {
        let pattern = filter.search.as_ref().map(|s| s.like_pattern());

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM departments d WHERE {SEARCH_CLAUSE}"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count departments"))?;

        let departments = sqlx::query_as::<_, DepartmentSummary>(&format!(
            "SELECT d.*, \
             (SELECT COUNT(*) FROM users u WHERE u.department_id = d.id AND u.role = 'student') \
                AS student_count, \
             (SELECT COUNT(*) FROM users u WHERE u.department_id = d.id AND u.role = 'supervisor') \
                AS supervisor_count \
             FROM departments d WHERE {SEARCH_CLAUSE} \
             ORDER BY d.created_at DESC, d.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list departments"))?;

        Ok(PageResponse::new(
            departments,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn active_departments(&self) -> AppResult<Vec<Department>> {
        sqlx::query_as::<_, Department>(
            "SELECT * FROM departments WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list active departments"))
    }

    async fn department_stats(&self) -> AppResult<DepartmentStats> {
        let (total, active, inactive): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
             COUNT(*) FILTER (WHERE is_active), \
             COUNT(*) FILTER (WHERE NOT is_active) \
             FROM departments",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to compute department stats"))?;

        Ok(DepartmentStats {
            total,
            active,
            inactive,
        })
    }

    async fn department_members(&self, id: DepartmentId) -> AppResult<DepartmentMembers> {
        sqlx::query_as::<_, DepartmentMembers>(
            "SELECT \
             COUNT(*) FILTER (WHERE role = 'student') AS total_students, \
             COUNT(*) FILTER (WHERE role = 'supervisor') AS total_supervisors, \
             COUNT(*) FILTER (WHERE role = 'student' AND supervisor_id IS NULL) \
                AS unassigned_students \
             FROM users WHERE department_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count department members"))
    }
}
