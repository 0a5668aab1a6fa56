//! Seed integrity report.

use crate::output::{self, OutputFormat};
use expressui_core::error::AppError;
use expressui_store::{SeedData, SeedIssue};
use serde::Serialize;
use tabled::Tabled;

/// Issue display row for table output
#[derive(Debug, Serialize, Tabled)]
struct IssueRow {
    subject: String,
    problem: String,
}

impl From<SeedIssue> for IssueRow {
    fn from(issue: SeedIssue) -> Self {
        Self {
            subject: issue.subject,
            problem: issue.message,
        }
    }
}

/// Execute the validate command. Fails when any issue is found.
pub fn execute(seed: &SeedData, format: OutputFormat) -> Result<(), AppError> {
    let issues = seed.audit();
    if issues.is_empty() {
        output::print_success(&format!(
            "Seed is valid ({} roles, {} users)",
            seed.roles.len(),
            seed.users.len()
        ));
        return Ok(());
    }

    let count = issues.len();
    let rows: Vec<IssueRow> = issues.into_iter().map(IssueRow::from).collect();
    output::print_warning(&format!("{count} problem(s) found"));
    output::print_list(&rows, format);
    Err(AppError::validation(format!("Seed has {count} problem(s)")))
}
