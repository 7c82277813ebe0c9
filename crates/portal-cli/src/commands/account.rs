//! Account management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use portal_core::error::AppError;
use portal_core::types::UserId;
use portal_entity::user::{AccountFilter, User, UserRole, UserStatus};

use super::{Cli, PageArgs, Session};
use crate::output;

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account subcommand
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// List accounts other than the actor's
    List {
        /// Case-insensitive search on name, email or matric number
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by role (student, supervisor, superadmin)
        #[arg(short, long)]
        role: Option<UserRole>,
        /// Filter by status (active, paused)
        #[arg(long)]
        status: Option<UserStatus>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one account
    Show {
        /// User ID
        id: UserId,
    },
    /// Pause an account
    Pause {
        /// User ID
        id: UserId,
    },
    /// Re-activate a paused account
    Activate {
        /// User ID
        id: UserId,
    },
    /// Delete an account permanently
    Delete {
        /// User ID
        id: UserId,
    },
    /// Show the actor's dashboard
    Dashboard,
}

/// Account display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct AccountRow {
    id: String,
    name: String,
    email: String,
    matric_no: String,
    role: String,
    status: String,
    created_at: String,
}

impl From<User> for AccountRow {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name,
            email: u.email,
            matric_no: u.matric_no.unwrap_or_default(),
            role: u.role.to_string(),
            status: u.status.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute account commands
pub async fn execute(args: &AccountArgs, cli: &Cli, session: &Session) -> Result<(), AppError> {
    let accounts = &session.state.accounts;
    let ctx = cli.actor(session).await?;
    let format = cli.format;

    match &args.command {
        AccountCommand::List {
            search,
            role,
            status,
            page,
        } => {
            let filter = AccountFilter::default()
                .with_search(search.as_deref())
                .with_role(*role)
                .with_status(*status);
            let page = accounts
                .list_accounts(&ctx, filter, page.request(session.config()))
                .await?;
            output::print_page(&page.map(AccountRow::from), format);
        }
        AccountCommand::Show { id } => {
            let user = accounts.get_account(&ctx, *id).await?;
            output::print_item(&user, format);
        }
        AccountCommand::Pause { id } => {
            let user = accounts.pause_user(&ctx, *id).await?;
            output::print_success(&format!("Account '{}' paused", user.email));
        }
        AccountCommand::Activate { id } => {
            let user = accounts.activate_user(&ctx, *id).await?;
            output::print_success(&format!("Account '{}' activated", user.email));
        }
        AccountCommand::Delete { id } => {
            let user = accounts.get_account(&ctx, *id).await?;
            if !cli.confirm(&format!("Permanently delete '{}'?", user.email))? {
                println!("Cancelled.");
                return Ok(());
            }
            accounts.delete_user(&ctx, *id).await?;
            output::print_success(&format!("Account '{}' deleted", user.email));
        }
        AccountCommand::Dashboard => {
            let dashboard = session.state.dashboards.dashboard(&ctx).await?;
            output::print_item(&dashboard, format);
        }
    }

    Ok(())
}
