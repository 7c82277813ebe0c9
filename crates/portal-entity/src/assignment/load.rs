//! Supervisor load reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::user::User;

/// Supervisors this close to capacity are reported as nearly full.
pub const NEARLY_FULL_MARGIN: u32 = 2;

/// How close a supervisor is to capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBand {
    /// More than [`NEARLY_FULL_MARGIN`] seats left.
    Available,
    /// At most [`NEARLY_FULL_MARGIN`] seats left.
    NearlyFull,
    /// No seats left.
    Full,
}

impl LoadBand {
    pub fn classify(assigned: u32, capacity: u32) -> Self {
        if assigned >= capacity {
            Self::Full
        } else if capacity - assigned <= NEARLY_FULL_MARGIN {
            Self::NearlyFull
        } else {
            Self::Available
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::NearlyFull => "nearly full",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for LoadBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A supervisor together with how many students they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorLoad {
    pub supervisor: User,
    pub assigned: u32,
    pub capacity: u32,
}

impl SupervisorLoad {
    pub fn new(supervisor: User, assigned: u32, capacity: u32) -> Self {
        Self {
            supervisor,
            assigned,
            capacity,
        }
    }

    /// Remaining seats, never negative.
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.assigned)
    }

    pub fn is_full(&self) -> bool {
        self.band() == LoadBand::Full
    }

    pub fn band(&self) -> LoadBand {
        LoadBand::classify(self.assigned, self.capacity)
    }

    /// `assigned/capacity`, as shown in listings.
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.assigned, self.capacity)
    }
}

/// Supervisors counted per [`LoadBand`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorLoadStats {
    pub total: u64,
    pub available: u64,
    pub nearly_full: u64,
    pub full: u64,
}

impl SupervisorLoadStats {
    /// Tally the live student counts of a set of supervisors.
    pub fn from_counts(counts: impl IntoIterator<Item = u32>, capacity: u32) -> Self {
        counts
            .into_iter()
            .fold(Self::default(), |mut stats, assigned| {
                stats.total += 1;
                match LoadBand::classify(assigned, capacity) {
                    LoadBand::Available => stats.available += 1,
                    LoadBand::NearlyFull => stats.nearly_full += 1,
                    LoadBand::Full => stats.full += 1,
                }
                stats
            })
    }
}
