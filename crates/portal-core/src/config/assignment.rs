//! Supervisor assignment configuration.

use serde::{Deserialize, Serialize};

/// Default number of students a supervisor may hold at once.
pub const DEFAULT_SUPERVISOR_CAPACITY: u32 = 8;

/// Supervisor assignment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// Hard cap on students simultaneously assigned to one supervisor.
    #[serde(default = "default_capacity")]
    pub max_students_per_supervisor: u32,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_students_per_supervisor: default_capacity(),
        }
    }
}

fn default_capacity() -> u32 {
    DEFAULT_SUPERVISOR_CAPACITY
}
