//! Portal-wide account counts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account totals shown on the superadmin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccountCounts {
    pub students: i64,
    pub supervisors: i64,
    pub superadmins: i64,
    pub paused: i64,
    pub unassigned_students: i64,
}
