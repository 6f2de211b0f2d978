//! inductrack CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "inductrack",
    version,
    about = "Induction assignment tracking and compliance tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a roster of assignments
    Summary {
        /// Path to roster JSON (array of assignments)
        #[arg(long)]
        roster: PathBuf,

        /// Derive statuses at this RFC 3339 instant instead of now
        #[arg(long)]
        as_of: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the snapshot as a compliance report JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Send reminders for overdue and due-soon assignments
    Remind {
        /// Path to roster JSON (array of assignments)
        #[arg(long)]
        roster: PathBuf,

        /// Derive statuses at this RFC 3339 instant instead of now
        #[arg(long)]
        as_of: Option<String>,

        /// Channel name from config (default: the config's default_channel)
        #[arg(long)]
        channel: Option<String>,

        /// Path to user directory JSON (array of users)
        #[arg(long)]
        users: Option<PathBuf>,

        /// Print reminders instead of delivering them
        #[arg(long)]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two compliance reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any assignment lapsed into overdue
        #[arg(long)]
        fail_on_lapse: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate induction TOML files
    Validate {
        /// Path to induction file or directory
        #[arg(long)]
        inductions: PathBuf,
    },

    /// Create starter config and example induction
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("inductrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summary {
            roster,
            as_of,
            format,
            output,
        } => commands::summary::execute(roster, as_of, format, output),
        Commands::Remind {
            roster,
            as_of,
            channel,
            users,
            dry_run,
            config,
        } => commands::remind::execute(roster, as_of, channel, users, dry_run, config).await,
        Commands::Compare {
            baseline,
            current,
            fail_on_lapse,
            format,
        } => commands::compare::execute(baseline, current, fail_on_lapse, format),
        Commands::Validate { inductions } => commands::validate::execute(inductions),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
