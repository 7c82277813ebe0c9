//! Demo data seeding.

use clap::Args;

use portal_core::error::AppError;
use portal_service::{SeedOptions, SuperadminSeed};

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Email of a superadmin account to create
    #[arg(long)]
    pub superadmin_email: Option<String>,

    /// Display name of the superadmin account
    #[arg(long, default_value = "Portal Administrator", requires = "superadmin_email")]
    pub superadmin_name: String,

    /// Credential hash given to every seeded account. Omit to seed
    /// accounts that cannot sign in.
    #[arg(long)]
    pub credential_hash: Option<String>,
}

/// Execute the seed command
pub async fn execute(
    args: &SeedArgs,
    session: &Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut options = SeedOptions::new(&session.config().registration.email_domain);
    if let Some(hash) = &args.credential_hash {
        options.credential_hash = hash.clone();
    }
    options.superadmin = args.superadmin_email.as_ref().map(|email| SuperadminSeed {
        name: args.superadmin_name.clone(),
        email: email.clone(),
    });

    let report = session.state.seeder.seed(&options).await?;

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            output::print_success("Seeding complete.");
            output::print_kv("Departments created", report.departments_created);
            output::print_kv("Supervisors created", report.supervisors_created);
            output::print_kv("Students created", report.students_created);
            output::print_kv("Superadmins created", report.superadmins_created);
            output::print_kv("Skipped (existing)", report.skipped);
        }
    }
    Ok(())
}
