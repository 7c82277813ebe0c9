//! Registration commands.
//!
//! Credentials are hashed by the identity provider; these commands take the
//! finished hash, or seed a disabled credential when none is given.

use clap::{Args, Subcommand};

use portal_core::error::AppError;
use portal_core::types::DepartmentId;
use portal_service::RegisterAccount;
use portal_service::seed::DISABLED_CREDENTIAL;

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for registration commands
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Registration subcommand
    #[command(subcommand)]
    pub command: RegisterCommand,
}

/// Registration form fields.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Full name
    #[arg(short, long)]
    pub name: String,
    /// Institutional email address
    #[arg(short, long)]
    pub email: String,
    /// Department ID
    #[arg(short, long)]
    pub department: DepartmentId,
    /// Pre-hashed credential
    #[arg(long)]
    pub credential_hash: Option<String>,
}

impl FormArgs {
    fn form(&self) -> RegisterAccount {
        RegisterAccount::new(
            &self.name,
            &self.email,
            self.credential_hash
                .clone()
                .unwrap_or_else(|| DISABLED_CREDENTIAL.to_string()),
            self.department,
        )
    }
}

/// Registration subcommands
#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    /// Register a student (email: name.matricno@domain)
    Student(FormArgs),
    /// Register a supervisor (email: first.last@domain)
    Supervisor(FormArgs),
}

/// Execute registration commands
pub async fn execute(
    args: &RegisterArgs,
    session: &Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let registration = &session.state.registration;

    let user = match &args.command {
        RegisterCommand::Student(form) => registration.register_student(form.form()).await?,
        RegisterCommand::Supervisor(form) => {
            registration.register_supervisor(form.form()).await?
        }
    };

    match format {
        OutputFormat::Json => output::print_item(&user, format),
        OutputFormat::Table => output::print_success(&format!(
            "Registered {} '{}' (id: {})",
            user.role, user.email, user.id
        )),
    }
    Ok(())
}
