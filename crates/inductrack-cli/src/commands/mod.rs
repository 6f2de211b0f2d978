//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use inductrack_core::assignment::Assignment;

pub mod compare;
pub mod init;
pub mod remind;
pub mod summary;
pub mod validate;

/// Load a roster file: a JSON array of assignments.
pub(crate) fn load_roster(path: &Path) -> Result<Vec<Assignment>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse roster JSON: {}", path.display()))
}

/// Resolve an `--as-of` override, defaulting to the current instant.
pub(crate) fn parse_as_of(as_of: Option<&str>) -> Result<DateTime<Utc>> {
    match as_of {
        Some(raw) => raw
            .parse::<DateTime<Utc>>()
            .with_context(|| format!("invalid --as-of instant: {raw}")),
        None => Ok(Utc::now()),
    }
}
