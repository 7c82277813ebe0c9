//! Supervisor assignment commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use portal_core::error::AppError;
use portal_core::types::{DepartmentId, UserId};
use portal_entity::assignment::{AssignmentPlan, SupervisorLoad};
use portal_entity::user::{StudentFilter, SupervisorFilter, SupervisorListFilter};

use super::account::AccountRow;
use super::{Cli, PageArgs, Session};
use crate::output::{self, OutputFormat};

/// Arguments for assignment commands
#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Assignment subcommand
    #[command(subcommand)]
    pub command: AssignCommand,
}

/// Filters shared by student listing and selection.
#[derive(Debug, Clone, Args)]
pub struct StudentFilterArgs {
    /// Case-insensitive search on name, email or matric number
    #[arg(short, long)]
    pub search: Option<String>,
    /// `all`, `unassigned` or a supervisor ID
    #[arg(long, default_value = "all")]
    pub supervisor: SupervisorFilter,
    /// Restrict to one department
    #[arg(short, long)]
    pub department: Option<DepartmentId>,
}

impl StudentFilterArgs {
    fn filter(&self) -> StudentFilter {
        let filter = StudentFilter::default()
            .with_search(self.search.as_deref())
            .with_supervisor(self.supervisor);
        match self.department {
            Some(id) => filter.in_department(id),
            None => filter,
        }
    }
}

/// Assignment subcommands
#[derive(Debug, Subcommand)]
pub enum AssignCommand {
    /// List students with their supervisor
    Students {
        #[command(flatten)]
        filter: StudentFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List supervisors with their current load
    Supervisors {
        /// Case-insensitive search on name or email
        #[arg(short, long)]
        search: Option<String>,
        /// Restrict to one department
        #[arg(short, long)]
        department: Option<DepartmentId>,
        /// Only supervisors below capacity
        #[arg(long)]
        with_free_slots: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count supervisors that are available, nearly full or full
    Stats {
        /// Restrict to one department
        #[arg(short, long)]
        department: Option<DepartmentId>,
    },
    /// Assign one student to a supervisor
    Student {
        /// Student ID
        student: UserId,
        /// Supervisor ID
        supervisor: UserId,
    },
    /// Assign several students to a supervisor, all or nothing
    Bulk {
        /// Supervisor ID
        supervisor: UserId,
        /// Student IDs
        #[arg(required_unless_present = "all_matching")]
        students: Vec<UserId>,
        /// Assign every student matching the filters instead of listed IDs
        #[arg(long)]
        all_matching: bool,
        #[command(flatten)]
        filter: StudentFilterArgs,
    },
    /// Clear a student's supervisor
    Unassign {
        /// Student ID
        student: UserId,
        /// Only act if the student belongs to this department
        #[arg(short, long)]
        department: Option<DepartmentId>,
    },
    /// Show a supervisor's load and students
    Load {
        /// Supervisor ID
        supervisor: UserId,
    },
}

/// Supervisor load display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LoadRow {
    id: String,
    name: String,
    email: String,
    students: String,
    available: u32,
    status: String,
}

impl From<SupervisorLoad> for LoadRow {
    fn from(load: SupervisorLoad) -> Self {
        Self {
            students: load.ratio(),
            available: load.available(),
            status: load.band().to_string(),
            id: load.supervisor.id.to_string(),
            name: load.supervisor.name,
            email: load.supervisor.email,
        }
    }
}

/// Execute assignment commands
pub async fn execute(args: &AssignArgs, cli: &Cli, session: &Session) -> Result<(), AppError> {
    let assignments = &session.state.assignments;
    let ctx = cli.actor(session).await?;
    let format = cli.format;

    match &args.command {
        AssignCommand::Students { filter, page } => {
            let page = assignments
                .list_students(&ctx, &filter.filter(), page.request(session.config()))
                .await?;
            output::print_page(&page.map(AccountRow::from), format);
        }
        AssignCommand::Supervisors {
            search,
            department,
            with_free_slots,
            page,
        } => {
            let mut filter = SupervisorListFilter::default().with_search(search.as_deref());
            if let Some(id) = department {
                filter = filter.in_department(*id);
            }
            if *with_free_slots {
                filter = filter.with_free_slots(assignments.capacity());
            }
            let page = assignments
                .list_supervisors(&ctx, &filter, page.request(session.config()))
                .await?;
            output::print_page(&page.map(LoadRow::from), format);
        }
        AssignCommand::Stats { department } => {
            let stats = assignments.supervisor_load_stats(&ctx, *department).await?;
            match format {
                OutputFormat::Json => output::print_item(&stats, format),
                OutputFormat::Table => {
                    output::print_kv("Supervisors", stats.total);
                    output::print_kv("Available", stats.available);
                    output::print_kv("Nearly full", stats.nearly_full);
                    output::print_kv("Full", stats.full);
                }
            }
        }
        AssignCommand::Student {
            student,
            supervisor,
        } => {
            let plan = assignments
                .assign_student(&ctx, *student, *supervisor)
                .await?;
            print_plan(&plan, format);
        }
        AssignCommand::Bulk {
            supervisor,
            students,
            all_matching,
            filter,
        } => {
            let ids = if *all_matching {
                assignments.select_students(&ctx, &filter.filter()).await?
            } else {
                students.clone()
            };
            if *all_matching
                && !cli.confirm(&format!("Assign all {} matching students?", ids.len()))?
            {
                println!("Cancelled.");
                return Ok(());
            }
            let plan = assignments
                .bulk_assign(&ctx, ids, *supervisor, filter.department)
                .await?;
            print_plan(&plan, format);
        }
        AssignCommand::Unassign {
            student,
            department,
        } => {
            let user = match department {
                Some(id) => {
                    assignments
                        .remove_supervisor_from_student(&ctx, *id, *student)
                        .await?
                }
                None => assignments.unassign_student(&ctx, *student).await?,
            };
            output::print_success(&format!("'{}' no longer has a supervisor", user.name));
        }
        AssignCommand::Load { supervisor } => {
            let load = assignments.supervisor_load(&ctx, *supervisor).await?;
            let students = assignments.students_of(&ctx, *supervisor).await?;
            match format {
                OutputFormat::Json => output::print_item(
                    &serde_json::json!({ "load": load, "students": students }),
                    format,
                ),
                OutputFormat::Table => {
                    output::print_kv("Supervisor", &load.supervisor.name);
                    output::print_kv("Students", load.ratio());
                    output::print_kv("Status", load.band());
                    let rows: Vec<AccountRow> =
                        students.into_iter().map(AccountRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}

fn print_plan(plan: &AssignmentPlan, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_item(plan, format),
        OutputFormat::Table => output::print_success(&format!(
            "Assigned {} student(s). Supervisor now has {}/{}.",
            plan.student_ids.len(),
            plan.resulting_count,
            plan.capacity
        )),
    }
}
