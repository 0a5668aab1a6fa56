//! Role default policy enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome applied by a role when no permission record matches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DefaultPolicy {
    /// Unmatched queries are allowed.
    Allow,
    /// Unmatched queries are denied.
    Deny,
}

impl DefaultPolicy {
    /// Whether this policy allows unmatched queries.
    pub fn allows(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Return the policy as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
        }
    }
}

impl fmt::Display for DefaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DefaultPolicy {
    type Err = expressui_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(expressui_core::AppError::validation(format!(
                "Invalid default policy: '{s}'. Expected one of: allow, deny"
            ))),
        }
    }
}
