//! CLI command definitions and dispatch.

pub mod check;
pub mod password;
pub mod role;
pub mod user;
pub mod validate;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use expressui_core::config::AppConfig;
use expressui_core::error::AppError;
use expressui_store::{MemoryStore, SeedData};

/// ExpressUI: role and field-level security administration
#[derive(Debug, Parser)]
#[command(name = "expressui", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (extension optional)
    #[arg(short, long, default_value = "config/expressui")]
    pub config: String,

    /// Seed file to load instead of `store.seed_file`
    #[arg(short, long, global = true)]
    pub seed: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Role inspection
    Role(role::RoleArgs),
    /// User inspection
    User(user::UserArgs),
    /// Evaluate a permission for a user
    Check(check::CheckArgs),
    /// Report integrity problems in the seed file
    Validate,
    /// Produce an Argon2id hash for a seed file
    HashPassword(password::HashPasswordArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Role(args) => role::execute(args, &self.open_store(config).await?, self.format).await,
            Commands::User(args) => user::execute(args, &self.open_store(config).await?, self.format).await,
            Commands::Check(args) => {
                check::execute(args, self.open_store(config).await?, config, self.format).await
            }
            Commands::Validate => validate::execute(&self.load_seed(config)?, self.format),
            Commands::HashPassword(args) => password::execute(args),
        }
    }

    /// Resolve the seed file from the flag or configuration and parse it.
    fn load_seed(&self, config: &AppConfig) -> Result<SeedData, AppError> {
        let path = self
            .seed
            .as_deref()
            .or(config.store.seed_file.as_deref())
            .ok_or_else(|| {
                AppError::configuration("No seed file given; pass --seed or set store.seed_file")
            })?;
        tracing::debug!(path, "Reading seed file");
        SeedData::load(path)
    }

    /// Build a store from the seed file.
    async fn open_store(&self, config: &AppConfig) -> Result<MemoryStore, AppError> {
        MemoryStore::from_seed(&self.load_seed(config)?).await
    }
}
