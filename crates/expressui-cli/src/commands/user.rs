//! User inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use expressui_core::error::AppError;
use expressui_core::traits::Repository;
use expressui_store::MemoryStore;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Show the roles assigned to a user
    Roles {
        /// Login name
        login_name: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// Login name
    login_name: String,
    /// Account status
    status: String,
    /// Assigned role names
    roles: String,
}

/// Assigned role row for table output
#[derive(Debug, Serialize, Tabled)]
struct AssignedRoleRow {
    name: String,
    default_policy: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    store: &MemoryStore,
    format: OutputFormat,
) -> Result<(), AppError> {
    let users = store.users();

    match &args.command {
        UserCommand::List => {
            let mut rows = Vec::new();
            for user in users.find_all().await? {
                let roles = users.roles_for(&user.id).await?;
                let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
                rows.push(UserRow {
                    login_name: user.login_name.clone(),
                    status: user.login_blocker().unwrap_or("Active").to_string(),
                    roles: names.join(", "),
                });
            }
            output::print_list(&rows, format);
        }
        UserCommand::Roles { login_name } => {
            let user = users.get_by_login_name(login_name).await?;
            let rows: Vec<AssignedRoleRow> = users
                .roles_for(&user.id)
                .await?
                .into_iter()
                .map(|r| AssignedRoleRow {
                    name: r.name,
                    default_policy: r.default_policy.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
