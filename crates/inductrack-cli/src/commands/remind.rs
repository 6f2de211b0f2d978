//! The `inductrack remind` command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use inductrack_core::dispatch::{DispatchObserver, DispatchReport, ReminderDispatcher};
use inductrack_core::traits::{
    NotificationService, ReminderReceipt, UserDirectory, UserRecord,
};
use inductrack_notify::config::load_config_from;
use inductrack_notify::console::ConsoleNotifier;
use inductrack_notify::create_notifier;

/// Console progress observer.
struct ConsoleObserver;

impl DispatchObserver for ConsoleObserver {
    fn on_reminder_sent(&self, assignment_id: Uuid, receipt: &ReminderReceipt) {
        eprintln!(
            "  Sent: {assignment_id} via {} ({})",
            receipt.channel, receipt.message_id
        );
    }

    fn on_reminder_error(&self, assignment_id: Uuid, error: &str) {
        eprintln!("  ERROR: {assignment_id}: {error}");
    }

    fn on_run_complete(&self, report: &DispatchReport) {
        eprintln!(
            "\nDispatch complete: {}/{} sent, {} failed ({}ms)",
            report.sent, report.selected, report.failed, report.duration_ms
        );
    }
}

/// User directory backed by a JSON file (array of users).
struct FileDirectory {
    users: HashMap<Uuid, UserRecord>,
}

impl FileDirectory {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read users from {}", path.display()))?;
        let users: Vec<UserRecord> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse users JSON: {}", path.display()))?;
        Ok(Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        })
    }

    fn empty() -> Self {
        Self {
            users: HashMap::new(),
        }
    }
}

#[async_trait]
impl UserDirectory for FileDirectory {
    async fn get_user(&self, id: Uuid) -> anyhow::Result<UserRecord> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such user: {id}"))
    }
}

pub async fn execute(
    roster_path: PathBuf,
    as_of: Option<String>,
    channel: Option<String>,
    users_path: Option<PathBuf>,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let assignments = super::load_roster(&roster_path)?;
    let now = super::parse_as_of(as_of.as_deref())?;

    let notifier: Box<dyn NotificationService> = if dry_run {
        Box::new(ConsoleNotifier)
    } else {
        let name = channel.as_deref().unwrap_or(&config.default_channel);
        match config.channels.get(name) {
            Some(channel_config) => create_notifier(channel_config)?,
            // A bare installation still gets the console channel.
            None if name == "console" => Box::new(ConsoleNotifier),
            None => anyhow::bail!(
                "channel '{}' not found in config. Available: {:?}",
                name,
                config.channels.keys().collect::<Vec<_>>()
            ),
        }
    };

    let directory: Arc<dyn UserDirectory> = match &users_path {
        Some(path) => Arc::new(FileDirectory::load(path)?),
        None => Arc::new(FileDirectory::empty()),
    };

    let dispatcher =
        ReminderDispatcher::new(Arc::from(notifier), directory, config.dispatch_config());

    let report = dispatcher.run(&assignments, now, &ConsoleObserver).await;

    if report.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
