//! Permission evaluation command.

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::output::{self, OutputFormat};
use expressui_auth::SecurityService;
use expressui_core::config::AppConfig;
use expressui_core::error::AppError;
use expressui_entity::permission::PermissionAction;
use expressui_store::MemoryStore;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Login name of the user to evaluate
    pub login_name: String,
    /// Entity type name, e.g. `Invoice`
    pub entity_type: String,
    /// Restrict the check to one field (view and edit only)
    #[arg(long)]
    pub field: Option<String>,
    /// Action to evaluate
    #[arg(short, long, value_enum, default_value = "view")]
    pub action: ActionArg,
}

/// Action names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    View,
    Create,
    Edit,
    Delete,
}

impl From<ActionArg> for PermissionAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::View => Self::View,
            ActionArg::Create => Self::Create,
            ActionArg::Edit => Self::Edit,
            ActionArg::Delete => Self::Delete,
        }
    }
}

/// Outcome of a check, for JSON output
#[derive(Debug, Serialize)]
struct CheckOutcome<'a> {
    login_name: &'a str,
    roles: Vec<&'a str>,
    entity_type: &'a str,
    field: Option<&'a str>,
    action: PermissionAction,
    allowed: bool,
}

/// Execute the check command
pub async fn execute(
    args: &CheckArgs,
    store: MemoryStore,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let action = PermissionAction::from(args.action);
    let service = SecurityService::new(store, &config.security);
    let principal = service.load_principal(&args.login_name).await?;

    let allowed = match &args.field {
        Some(field) => service
            .enforcer()
            .check_field(&principal, action, &args.entity_type, field)?,
        None => service
            .enforcer()
            .check(&principal, action, &args.entity_type)?,
    };

    match format {
        OutputFormat::Json => output::print_json(&CheckOutcome {
            login_name: principal.login_name(),
            roles: principal.role_names(),
            entity_type: &args.entity_type,
            field: args.field.as_deref(),
            action,
            allowed,
        }),
        OutputFormat::Table => {
            let target = match &args.field {
                Some(field) => format!("{}.{}", args.entity_type, field),
                None => args.entity_type.clone(),
            };
            let verdict = if allowed { "ALLOWED" } else { "DENIED" };
            println!("{verdict}: {} {action} {target}", principal.login_name());
            output::print_kv("Roles", &principal.role_names().join(", "));
        }
    }

    Ok(())
}
