//! Role inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use expressui_core::error::AppError;
use expressui_core::traits::Repository;
use expressui_store::MemoryStore;

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles
    List,
    /// Show one role's permission records
    Show {
        /// Role name
        name: String,
    },
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role name
    name: String,
    /// Default policy
    default_policy: String,
    /// Number of permission records
    permissions: usize,
    /// Number of users holding the role
    users: usize,
    /// Description
    description: String,
}

/// Permission display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    entity_type: String,
    field: String,
    view: bool,
    create: bool,
    edit: bool,
    delete: bool,
}

/// Execute role commands
pub async fn execute(
    args: &RoleArgs,
    store: &MemoryStore,
    format: OutputFormat,
) -> Result<(), AppError> {
    let roles = store.roles();

    match &args.command {
        RoleCommand::List => {
            let mut rows = Vec::new();
            for role in roles.find_all().await? {
                let users = store.users().users_in_role(&role.id).await?;
                rows.push(RoleRow {
                    name: role.name.clone(),
                    default_policy: role.default_policy.to_string(),
                    permissions: role.permissions.len(),
                    users: users.len(),
                    description: role.description.clone().unwrap_or_default(),
                });
            }
            output::print_list(&rows, format);
        }
        RoleCommand::Show { name } => {
            let role = roles.get_by_name(name).await?;

            let mut permissions: Vec<_> = role.permissions.iter().collect();
            permissions.sort_by(|a, b| {
                (&a.entity_type, &a.field).cmp(&(&b.entity_type, &b.field))
            });
            let rows: Vec<PermissionRow> = permissions
                .into_iter()
                .map(|p| PermissionRow {
                    entity_type: p.entity_type.clone(),
                    field: p.field.clone().unwrap_or_else(|| "*".to_string()),
                    view: p.view_allowed,
                    create: p.create_allowed,
                    edit: p.edit_allowed,
                    delete: p.delete_allowed,
                })
                .collect();

            match format {
                OutputFormat::Json => output::print_json(&role),
                OutputFormat::Table => {
                    output::print_kv("Role", &role.name);
                    output::print_kv("Default policy", role.default_policy.as_str());
                    output::print_kv("Description", role.description.as_deref().unwrap_or("-"));
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}
