//! The `inductrack summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use inductrack_core::report::ComplianceReport;
use inductrack_core::results::StatusSummary;

pub fn execute(
    roster_path: PathBuf,
    as_of: Option<String>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let assignments = super::load_roster(&roster_path)?;
    let as_of = super::parse_as_of(as_of.as_deref())?;

    let report = ComplianceReport::build(&assignments, as_of);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_summary(&report);
        }
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &ComplianceReport) {
    println!(
        "As of {}: {} assignment(s)",
        report.as_of, report.rollup.overall.total
    );

    let mut table = Table::new();
    table.set_header(vec![
        "Induction",
        "Total",
        "Assigned",
        "In Progress",
        "Complete",
        "Overdue",
        "Complete %",
    ]);

    for (induction_id, summary) in &report.rollup.per_induction {
        table.add_row(summary_row(induction_id, summary));
    }
    if report.rollup.per_induction.len() > 1 {
        table.add_row(summary_row("(all)", &report.rollup.overall));
    }

    println!("{table}");
}

fn summary_row(label: &str, summary: &StatusSummary) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(summary.total),
        Cell::new(summary.assigned),
        Cell::new(summary.in_progress),
        Cell::new(summary.complete),
        Cell::new(summary.overdue),
        Cell::new(format!("{:.1}%", summary.completion_rate() * 100.0)),
    ]
}
