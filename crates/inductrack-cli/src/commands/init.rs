//! The `inductrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create inductrack.toml
    if std::path::Path::new("inductrack.toml").exists() {
        println!("inductrack.toml already exists, skipping.");
    } else {
        std::fs::write("inductrack.toml", SAMPLE_CONFIG)?;
        println!("Created inductrack.toml");
    }

    // Create example induction
    std::fs::create_dir_all("inductions")?;
    let example_path = std::path::Path::new("inductions/example.toml");
    if example_path.exists() {
        println!("inductions/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_INDUCTION)?;
        println!("Created inductions/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit inductions/example.toml with your questions");
    println!("  2. Run: inductrack validate --inductions inductions/example.toml");
    println!("  3. Run: inductrack summary --roster roster.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# inductrack configuration

default_channel = "console"
due_soon_hours = 48
max_retries = 3
retry_delay_ms = 1000
parallelism = 4

[channels.console]
type = "console"

[channels.webhook]
type = "webhook"
endpoint = "${INDUCTRACK_WEBHOOK_URL}"
auth_token = "${INDUCTRACK_WEBHOOK_TOKEN}"
"#;

const EXAMPLE_INDUCTION: &str = r#"[induction]
id = "example"
name = "Example Induction"
department = "People"
description = "A simple example induction to get started"

[[questions]]
id = "welcome"
type = "information"
question = "Welcome aboard! Read the handbook before you continue."

[[questions]]
id = "handbook-read"
type = "yes_no"
question = "Have you read the staff handbook?"
correct_option = 0

[[questions]]
id = "fire-exits"
type = "multichoice"
question = "Which of these are fire exits?"
options = ["Main stairwell", "Lift lobby", "Rear fire door"]
correct_options = [0, 2]

[[questions]]
id = "first-day"
type = "short_answer"
question = "Describe what you should do on hearing the fire alarm."
"#;
