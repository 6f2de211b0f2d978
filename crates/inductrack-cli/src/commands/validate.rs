//! The `inductrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(inductions_path: PathBuf) -> Result<()> {
    let inductions = if inductions_path.is_dir() {
        inductrack_core::parser::load_induction_directory(&inductions_path)?
    } else {
        vec![inductrack_core::parser::parse_induction(&inductions_path)?]
    };

    let mut total_warnings = 0;

    for induction in &inductions {
        println!(
            "Induction: {} ({} questions)",
            induction.name,
            induction.questions.len()
        );

        let warnings = inductrack_core::parser::validate_induction(induction);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All inductions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
