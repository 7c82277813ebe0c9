//! Role-specific dashboards.

pub mod service;

pub use service::{
    Dashboard, DashboardService, StudentDashboard, SuperadminDashboard, SupervisorDashboard,
};
