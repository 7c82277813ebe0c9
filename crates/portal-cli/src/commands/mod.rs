//! CLI command definitions and dispatch.

pub mod account;
pub mod assign;
pub mod department;
pub mod migrate;
pub mod register;
pub mod seed;

use clap::{Args, Parser, Subcommand};

use portal_core::config::AppConfig;
use portal_core::error::AppError;
use portal_core::types::PageRequest;
use portal_database::{DatabasePool, Stores};
use portal_service::{ActorContext, AppState};

use crate::output::OutputFormat;

/// Department portal operator console
#[derive(Debug, Parser)]
#[command(name = "portal", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay merged from config/<env>
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Email of the account performing the command
    #[arg(short, long, global = true)]
    pub actor: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Load the demo departments and accounts
    Seed(seed::SeedArgs),
    /// Department management
    Department(department::DepartmentArgs),
    /// Account management and dashboards
    Account(account::AccountArgs),
    /// Supervisor assignment
    Assign(assign::AssignArgs),
    /// Student and supervisor registration
    Register(register::RegisterArgs),
}

/// Paging flags shared by list commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<u64>,
}

impl PageArgs {
    pub fn request(&self, config: &AppConfig) -> PageRequest {
        PageRequest::new(
            self.page,
            self.page_size
                .unwrap_or(config.pagination.default_page_size),
        )
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let session = Session::open(config).await?;
        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &session).await,
            Commands::Seed(args) => seed::execute(args, &session, self.format).await,
            Commands::Department(args) => department::execute(args, self, &session).await,
            Commands::Account(args) => account::execute(args, self, &session).await,
            Commands::Assign(args) => assign::execute(args, self, &session).await,
            Commands::Register(args) => register::execute(args, &session, self.format).await,
        };
        session.close().await;
        result
    }

    /// Resolve `--actor` to an active account.
    pub async fn actor(&self, session: &Session) -> Result<ActorContext, AppError> {
        let email = self.actor.as_deref().ok_or_else(|| {
            AppError::authorization("This command requires --actor <email>")
        })?;
        let user = session
            .state
            .stores
            .users
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No account with email '{email}'")))?;
        if !user.is_active() {
            return Err(AppError::authorization(format!(
                "The account '{email}' is paused"
            )));
        }
        tracing::debug!(actor_id = %user.id, role = %user.role, "Resolved actor");
        Ok(ActorContext::for_user(&user))
    }

    /// Ask before a destructive action unless `--yes` was given.
    pub fn confirm(&self, prompt: &str) -> Result<bool, AppError> {
        if self.yes {
            return Ok(true);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))
    }
}

/// A connected database with every service wired over it.
pub struct Session {
    pub state: AppState,
    pool: DatabasePool,
}

impl Session {
    async fn open(config: AppConfig) -> Result<Self, AppError> {
        let pool = DatabasePool::connect(&config.database).await?;
        let stores = Stores::postgres(pool.pool().clone());
        let state = AppState::new(config, stores)?;
        Ok(Self { state, pool })
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    async fn close(self) {
        self.pool.close().await;
    }
}
