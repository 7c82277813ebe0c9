//! Academic departments.

pub mod model;

pub use model::{
    CreateDepartment, Department, DepartmentFilter, DepartmentMembers, DepartmentOverview,
    DepartmentStats, DepartmentSummary, UpdateDepartment,
};
