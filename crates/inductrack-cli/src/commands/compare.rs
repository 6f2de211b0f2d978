//! The `inductrack compare` command.

use std::path::PathBuf;

use anyhow::Result;

use inductrack_core::report::ComplianceReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_lapse: bool,
    format: String,
) -> Result<()> {
    let baseline = ComplianceReport::load_json(&baseline_path)?;
    let current = ComplianceReport::load_json(&current_path)?;

    let delta = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", delta.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&delta)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} lapses, {} completions, {} unchanged",
                delta.lapses.len(),
                delta.completions.len(),
                delta.unchanged
            );

            if !delta.lapses.is_empty() {
                println!("\nLapses:");
                for change in &delta.lapses {
                    println!(
                        "  {} (user {}) {} -> {}",
                        change.induction_id, change.user_id, change.from, change.to
                    );
                }
            }

            if !delta.completions.is_empty() {
                println!("\nCompletions:");
                for change in &delta.completions {
                    println!(
                        "  {} (user {}) {} -> {}",
                        change.induction_id, change.user_id, change.from, change.to
                    );
                }
            }

            if delta.new_assignments > 0 {
                println!("\n{} new assignment(s)", delta.new_assignments);
            }
            if delta.removed_assignments > 0 {
                println!("{} removed assignment(s)", delta.removed_assignments);
            }
        }
    }

    if fail_on_lapse && delta.has_lapses() {
        std::process::exit(1);
    }

    Ok(())
}
