//! Compliance snapshots with JSON persistence and lapse detection.
//!
//! A snapshot freezes the derived status of every assignment in a roster at
//! one instant. Comparing two snapshots surfaces the changes a compliance
//! officer cares about: who lapsed into overdue, and who completed.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::Assignment;
use crate::results::{compute_rollup, derive_display_status, DisplayStatus, RosterRollup};

/// A roster snapshot at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// The instant statuses were derived at (also the creation time).
    pub as_of: DateTime<Utc>,
    /// Roster-wide and per-induction rollups.
    pub rollup: RosterRollup,
    /// One entry per assignment.
    pub entries: Vec<ComplianceEntry>,
}

/// The derived state of one assignment inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEntry {
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub induction_id: String,
    pub status: DisplayStatus,
    pub due_date: DateTime<Utc>,
}

impl ComplianceReport {
    /// Snapshot a roster at `as_of`.
    pub fn build(assignments: &[Assignment], as_of: DateTime<Utc>) -> Self {
        let entries = assignments
            .iter()
            .map(|a| ComplianceEntry {
                assignment_id: a.id,
                user_id: a.user_id,
                induction_id: a.induction_id.clone(),
                status: derive_display_status(a, as_of),
                due_date: a.due_date,
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            as_of,
            rollup: compute_rollup(assignments, as_of),
            entries,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ComplianceReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against an earlier baseline.
    pub fn compare(&self, baseline: &ComplianceReport) -> ComplianceDelta {
        use std::collections::HashMap;

        let baseline_statuses: HashMap<Uuid, DisplayStatus> = baseline
            .entries
            .iter()
            .map(|e| (e.assignment_id, e.status))
            .collect();

        let mut lapses = Vec::new();
        let mut completions = Vec::new();
        let mut unchanged = 0usize;
        let mut new_assignments = 0usize;

        for entry in &self.entries {
            let Some(&previous) = baseline_statuses.get(&entry.assignment_id) else {
                new_assignments += 1;
                continue;
            };

            let change = StatusChange {
                assignment_id: entry.assignment_id,
                user_id: entry.user_id,
                induction_id: entry.induction_id.clone(),
                from: previous,
                to: entry.status,
            };

            if entry.status == DisplayStatus::Overdue && previous != DisplayStatus::Overdue {
                lapses.push(change);
            } else if entry.status == DisplayStatus::Complete
                && previous != DisplayStatus::Complete
            {
                completions.push(change);
            } else {
                unchanged += 1;
            }
        }

        let current_ids: std::collections::HashSet<Uuid> =
            self.entries.iter().map(|e| e.assignment_id).collect();
        let removed_assignments = baseline
            .entries
            .iter()
            .filter(|e| !current_ids.contains(&e.assignment_id))
            .count();

        ComplianceDelta {
            lapses,
            completions,
            unchanged,
            new_assignments,
            removed_assignments,
        }
    }
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDelta {
    /// Assignments that became overdue since the baseline.
    pub lapses: Vec<StatusChange>,
    /// Assignments that completed since the baseline.
    pub completions: Vec<StatusChange>,
    /// Assignments with no compliance-relevant change.
    pub unchanged: usize,
    /// Assignments in the current report but not the baseline.
    pub new_assignments: usize,
    /// Assignments in the baseline but not the current report.
    pub removed_assignments: usize,
}

/// One assignment's status movement between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub induction_id: String,
    pub from: DisplayStatus,
    pub to: DisplayStatus,
}

impl ComplianceDelta {
    /// Format the delta as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} lapses, {} completions, {} unchanged\n\n",
            self.lapses.len(),
            self.completions.len(),
            self.unchanged
        ));

        if !self.lapses.is_empty() {
            md.push_str("### Lapses\n\n");
            md.push_str("| Assignment | User | Induction | From | To |\n");
            md.push_str("|------------|------|-----------|------|----|\n");
            for change in &self.lapses {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    change.assignment_id,
                    change.user_id,
                    change.induction_id,
                    change.from,
                    change.to
                ));
            }
            md.push('\n');
        }

        if !self.completions.is_empty() {
            md.push_str("### Completions\n\n");
            md.push_str("| Assignment | User | Induction | From | To |\n");
            md.push_str("|------------|------|-----------|------|----|\n");
            for change in &self.completions {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    change.assignment_id,
                    change.user_id,
                    change.induction_id,
                    change.from,
                    change.to
                ));
            }
        }

        md
    }

    /// Returns true if any assignment lapsed into overdue.
    pub fn has_lapses(&self) -> bool {
        !self.lapses.is_empty()
    }
}
