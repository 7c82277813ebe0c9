//! Assignment repository: the transactional capacity check.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::{DepartmentId, UserId};
use portal_entity::assignment::{AssignmentPlan, AssignmentRequest};
use portal_entity::user::User;

use super::db_error;
use crate::store::AssignmentStore;

const COUNT_STUDENTS: &str =
    "SELECT COUNT(*) FROM users WHERE supervisor_id = $1 AND role = 'student'";

/// Repository for student to supervisor bookkeeping.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    /// Locks the supervisor row first, then the student rows in id order,
    /// so batches against one supervisor serialize and recount live.
    async fn assign(
        &self,
        request: &AssignmentRequest,
        capacity: u32,
    ) -> AppResult<AssignmentPlan> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let supervisor =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
                .bind(request.supervisor_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock supervisor"))?;

        let current: i64 = sqlx::query_scalar(COUNT_STUDENTS)
            .bind(request.supervisor_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to count supervisor students"))?;

        let ids = request.ids();
        let students = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("Failed to lock students"))?;

        debug!(
            supervisor_id = %request.supervisor_id,
            current,
            requested = ids.len(),
            found = students.len(),
            "Loaded assignment state"
        );

        // A rejected plan drops the transaction, which rolls back.
        let plan = AssignmentPlan::build(
            request,
            supervisor.as_ref(),
            &students,
            current as u32,
            capacity,
        )?;

        sqlx::query("UPDATE users SET supervisor_id = $1, updated_at = NOW() WHERE id = ANY($2)")
            .bind(plan.supervisor_id)
            .bind(&plan.student_ids)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to assign students"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit assignment"))?;

        info!(
            supervisor_id = %plan.supervisor_id,
            assigned = plan.student_ids.len(),
            count = plan.resulting_count,
            capacity,
            "Students assigned"
        );
        Ok(plan)
    }

    async fn unassign(&self, student_id: UserId, scope: Option<DepartmentId>) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET supervisor_id = NULL, updated_at = NOW() \
             WHERE id = $1 AND role = 'student' \
             AND ($2::uuid IS NULL OR department_id = $2) \
             RETURNING *",
        )
        .bind(student_id)
        .bind(scope)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to unassign student"))?
        .ok_or_else(|| AppError::not_found("Student not found"))
    }

    async fn student_count(&self, supervisor_id: UserId) -> AppResult<u32> {
        let count: i64 = sqlx::query_scalar(COUNT_STUDENTS)
            .bind(supervisor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count supervisor students"))?;
        Ok(count as u32)
    }

    async fn student_counts(&self, supervisor_ids: &[UserId]) -> AppResult<HashMap<UserId, u32>> {
        let rows: Vec<(UserId, i64)> = sqlx::query_as(
            "SELECT supervisor_id, COUNT(*) FROM users \
             WHERE role = 'student' AND supervisor_id = ANY($1) \
             GROUP BY supervisor_id",
        )
        .bind(supervisor_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to count supervisor students"))?;

        let mut counts: HashMap<UserId, u32> =
            supervisor_ids.iter().map(|id| (*id, 0)).collect();
        counts.extend(rows.into_iter().map(|(id, n)| (id, n as u32)));
        Ok(counts)
    }

    async fn supervisor_counts(&self, department_id: Option<DepartmentId>) -> AppResult<Vec<u32>> {
        let counts: Vec<i64> = sqlx::query_scalar(
            "SELECT COUNT(st.id) FROM users sv \
             LEFT JOIN users st ON st.supervisor_id = sv.id AND st.role = 'student' \
             WHERE sv.role = 'supervisor' \
             AND ($1::uuid IS NULL OR sv.department_id = $1) \
             GROUP BY sv.id",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to count supervisor loads"))?;

        Ok(counts.into_iter().map(|n| n as u32).collect())
    }

    async fn students_of(&self, supervisor_id: UserId) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE supervisor_id = $1 AND role = 'student' ORDER BY name ASC",
        )
        .bind(supervisor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list supervisor students"))
    }
}
