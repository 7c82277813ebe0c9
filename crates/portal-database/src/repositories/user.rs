//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::{PageRequest, PageResponse, UserId};
use portal_entity::user::{
    AccountCounts, AccountFilter, NewUser, StudentFilter, SupervisorFilter, SupervisorListFilter,
    User, UserStatus,
};

use super::{db_error, violated_constraint};
use crate::store::UserStore;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const DEPARTMENT_FK_CONSTRAINT: &str = "users_department_id_fkey";

/// `$1` search pattern, `$2` role, `$3` status, `$4` excluded id.
const ACCOUNT_WHERE: &str = "($1::text IS NULL OR name ILIKE $1 ESCAPE '\\' \
     OR email ILIKE $1 ESCAPE '\\' OR matric_no ILIKE $1 ESCAPE '\\') \
     AND ($2::user_role IS NULL OR role = $2) \
     AND ($3::user_status IS NULL OR status = $3) \
     AND ($4::uuid IS NULL OR id <> $4)";

/// `$1` search pattern, `$2` unassigned only, `$3` supervisor id, `$4` department id.
const STUDENT_WHERE: &str = "role = 'student' \
     AND ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\' \
     OR email ILIKE $1 ESCAPE '\\' OR matric_no ILIKE $1 ESCAPE '\\') \
     AND (NOT $2::boolean OR supervisor_id IS NULL) \
     AND ($3::uuid IS NULL OR supervisor_id = $3) \
     AND ($4::uuid IS NULL OR department_id = $4)";

/// `$1` search pattern, `$2` department id, `$3` exclusive student cap.
const SUPERVISOR_WHERE: &str = "role = 'supervisor' \
     AND ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\' OR email ILIKE $1 ESCAPE '\\') \
     AND ($2::uuid IS NULL OR department_id = $2) \
     AND ($3::int8 IS NULL OR (SELECT COUNT(*) FROM users st \
         WHERE st.supervisor_id = users.id AND st.role = 'student') < $3)";

/// Repository for account CRUD and listing queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Positional parameters of [`STUDENT_WHERE`].
fn student_params(filter: &StudentFilter) -> (Option<String>, bool, Option<UserId>) {
    let pattern = filter.search.as_ref().map(|s| s.like_pattern());
    match filter.supervisor {
        SupervisorFilter::Any => (pattern, false, None),
        SupervisorFilter::Unassigned => (pattern, true, None),
        SupervisorFilter::Supervisor(id) => (pattern, false, Some(id)),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))
    }

    async fn create_user(&self, input: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users \
             (id, name, email, credential_hash, matric_no, role, status, department_id, supervisor_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.credential_hash)
        .bind(&input.matric_no)
        .bind(input.role)
        .bind(input.status)
        .bind(input.department_id)
        .bind(input.supervisor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(EMAIL_CONSTRAINT) => AppError::validation(format!(
                "The email '{}' has already been taken.",
                input.email
            )),
            Some(DEPARTMENT_FK_CONSTRAINT) => {
                AppError::validation("The selected department is invalid.")
            }
            _ => db_error("Failed to create user")(e),
        })
    }

    async fn set_user_status(&self, id: UserId, status: UserStatus) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update user status"))?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn delete_user(&self, id: UserId) -> AppResult<User> {
        sqlx::query_as::<_, User>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to delete user"))?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn list_accounts(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let pattern = filter.search.as_ref().map(|s| s.like_pattern());

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {ACCOUNT_WHERE}"))
                .bind(&pattern)
                .bind(filter.role)
                .bind(filter.status)
                .bind(filter.exclude)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count accounts"))?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE {ACCOUNT_WHERE} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(&pattern)
        .bind(filter.role)
        .bind(filter.status)
        .bind(filter.exclude)
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list accounts"))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_students(
        &self,
        filter: &StudentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let (pattern, unassigned, supervisor) = student_params(filter);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {STUDENT_WHERE}"))
                .bind(&pattern)
                .bind(unassigned)
                .bind(supervisor)
                .bind(filter.department_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count students"))?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE {STUDENT_WHERE} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(&pattern)
        .bind(unassigned)
        .bind(supervisor)
        .bind(filter.department_id)
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list students"))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn student_ids(&self, filter: &StudentFilter) -> AppResult<Vec<UserId>> {
        let (pattern, unassigned, supervisor) = student_params(filter);

        sqlx::query_scalar::<_, UserId>(&format!(
            "SELECT id FROM users WHERE {STUDENT_WHERE} ORDER BY created_at DESC, id DESC"
        ))
        .bind(&pattern)
        .bind(unassigned)
        .bind(supervisor)
        .bind(filter.department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to select students"))
    }

    async fn list_supervisors(
        &self,
        filter: &SupervisorListFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let pattern = filter.search.as_ref().map(|s| s.like_pattern());
        let below = filter.below_capacity.map(i64::from);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {SUPERVISOR_WHERE}"))
                .bind(&pattern)
                .bind(filter.department_id)
                .bind(below)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count supervisors"))?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE {SUPERVISOR_WHERE} \
             ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
        ))
        .bind(&pattern)
        .bind(filter.department_id)
        .bind(below)
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list supervisors"))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn account_counts(&self) -> AppResult<AccountCounts> {
        sqlx::query_as::<_, AccountCounts>(
            "SELECT \
             COUNT(*) FILTER (WHERE role = 'student') AS students, \
             COUNT(*) FILTER (WHERE role = 'supervisor') AS supervisors, \
             COUNT(*) FILTER (WHERE role = 'superadmin') AS superadmins, \
             COUNT(*) FILTER (WHERE status = 'paused') AS paused, \
             COUNT(*) FILTER (WHERE role = 'student' AND supervisor_id IS NULL) \
                AS unassigned_students \
             FROM users",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count accounts"))
    }
}
