//! Department management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use portal_core::error::AppError;
use portal_core::types::DepartmentId;
use portal_entity::department::{
    CreateDepartment, Department, DepartmentFilter, DepartmentSummary, UpdateDepartment,
};

use super::{Cli, PageArgs, Session};
use crate::output;

/// Arguments for department commands
#[derive(Debug, Args)]
pub struct DepartmentArgs {
    /// Department subcommand
    #[command(subcommand)]
    pub command: DepartmentCommand,
}

/// Department subcommands
#[derive(Debug, Subcommand)]
pub enum DepartmentCommand {
    /// List departments with member counts
    List {
        /// Case-insensitive search on name or description
        #[arg(short, long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a department and its member counts
    Show {
        /// Department ID
        id: DepartmentId,
    },
    /// Create a department
    Create {
        /// Department name
        #[arg(short, long)]
        name: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
        /// Create the department inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Update a department. Omitted fields keep their current value.
    Update {
        /// Department ID
        id: DepartmentId,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Flip a department between active and inactive
    Toggle {
        /// Department ID
        id: DepartmentId,
    },
    /// Delete a department that has no users
    Delete {
        /// Department ID
        id: DepartmentId,
    },
    /// Show department totals
    Stats,
    /// List active departments, as offered at registration
    Active,
}

/// Department display row for table output
#[derive(Debug, Serialize, Tabled)]
struct DepartmentRow {
    id: String,
    name: String,
    description: String,
    active: bool,
    students: i64,
    supervisors: i64,
    created_at: String,
}

impl From<DepartmentSummary> for DepartmentRow {
    fn from(summary: DepartmentSummary) -> Self {
        let mut row = Self::from(summary.department);
        row.students = summary.student_count;
        row.supervisors = summary.supervisor_count;
        row
    }
}

impl From<Department> for DepartmentRow {
    fn from(d: Department) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name,
            description: d.description.unwrap_or_default(),
            active: d.is_active,
            students: 0,
            supervisors: 0,
            created_at: d.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute department commands
pub async fn execute(args: &DepartmentArgs, cli: &Cli, session: &Session) -> Result<(), AppError> {
    let departments = &session.state.departments;
    let format = cli.format;

    // The registration listing is public; everything else needs a superadmin.
    if let DepartmentCommand::Active = &args.command {
        let active: Vec<DepartmentRow> = departments
            .active_departments()
            .await?
            .into_iter()
            .map(DepartmentRow::from)
            .collect();
        output::print_list(&active, format);
        return Ok(());
    }

    let ctx = cli.actor(session).await?;

    match &args.command {
        DepartmentCommand::List { search, page } => {
            let filter = DepartmentFilter::default().with_search(search.as_deref());
            let page = departments
                .list_departments(&ctx, &filter, page.request(session.config()))
                .await?;
            output::print_page(&page.map(DepartmentRow::from), format);
        }
        DepartmentCommand::Show { id } => {
            let overview = departments.department_overview(&ctx, *id).await?;
            output::print_item(&overview, format);
        }
        DepartmentCommand::Create {
            name,
            description,
            inactive,
        } => {
            let department = departments
                .create_department(
                    &ctx,
                    CreateDepartment::new(name, description.as_deref(), !inactive),
                )
                .await?;
            output::print_success(&format!(
                "Department '{}' created (id: {})",
                department.name, department.id
            ));
        }
        DepartmentCommand::Update {
            id,
            name,
            description,
        } => {
            let current = departments.get_department(&ctx, *id).await?;
            let mut input = UpdateDepartment::from_current(&current);
            if let Some(name) = name {
                input.name = name.clone();
            }
            if let Some(description) = description {
                input.description = Some(description.clone());
            }
            let department = departments.update_department(&ctx, *id, input).await?;
            output::print_success(&format!("Department '{}' updated", department.name));
        }
        DepartmentCommand::Toggle { id } => {
            let department = departments.toggle_department_status(&ctx, *id).await?;
            let state = if department.is_active {
                "activated"
            } else {
                "deactivated"
            };
            output::print_success(&format!("Department '{}' {state}", department.name));
        }
        DepartmentCommand::Delete { id } => {
            let department = departments.get_department(&ctx, *id).await?;
            if !cli.confirm(&format!("Delete department '{}'?", department.name))? {
                println!("Cancelled.");
                return Ok(());
            }
            departments.delete_department(&ctx, *id).await?;
            output::print_success(&format!("Department '{}' deleted", department.name));
        }
        DepartmentCommand::Stats => {
            let stats = departments.department_stats(&ctx).await?;
            match format {
                output::OutputFormat::Json => output::print_item(&stats, format),
                output::OutputFormat::Table => {
                    output::print_kv("Total", stats.total);
                    output::print_kv("Active", stats.active);
                    output::print_kv("Inactive", stats.inactive);
                }
            }
        }
        DepartmentCommand::Active => {} // handled above
    }

    Ok(())
}
