//! Reminder dispatch across a roster.
//!
//! Selects the assignments that warrant a nudge at a given instant and fans
//! the reminders out through a [`NotificationService`] with bounded
//! parallelism and retries. The lifecycle engine stays untouched — dispatch
//! only reads assignments.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::assignment::Assignment;
use crate::error::NotifyError;
use crate::results::{derive_display_status, DisplayStatus};
use crate::traits::{NotificationService, ReminderReceipt, ReminderRequest, UserDirectory};

/// Configuration for the reminder dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum concurrent deliveries.
    pub parallelism: usize,
    /// Retries on transient channel errors.
    pub max_retries: u32,
    /// Delay between retries.
    pub retry_delay: Duration,
    /// How close to the due date an assignment gets a pre-emptive reminder.
    pub due_soon: chrono::Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            due_soon: chrono::Duration::hours(48),
        }
    }
}

/// Progress reporting trait.
pub trait DispatchObserver: Send + Sync {
    fn on_reminder_sent(&self, assignment_id: Uuid, receipt: &ReminderReceipt);
    fn on_reminder_error(&self, assignment_id: Uuid, error: &str);
    fn on_run_complete(&self, report: &DispatchReport);
}

/// No-op progress observer.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {
    fn on_reminder_sent(&self, _: Uuid, _: &ReminderReceipt) {}
    fn on_reminder_error(&self, _: Uuid, _: &str) {}
    fn on_run_complete(&self, _: &DispatchReport) {}
}

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    /// Assignments examined.
    pub scanned: usize,
    /// Assignments that warranted a reminder.
    pub selected: usize,
    /// Reminders delivered.
    pub sent: usize,
    /// Reminders that failed after retries.
    pub failed: usize,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Fans reminders out to a notification channel.
pub struct ReminderDispatcher {
    notifier: Arc<dyn NotificationService>,
    directory: Arc<dyn UserDirectory>,
    config: DispatchConfig,
}

impl ReminderDispatcher {
    pub fn new(
        notifier: Arc<dyn NotificationService>,
        directory: Arc<dyn UserDirectory>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            notifier,
            directory,
            config,
        }
    }

    /// Which assignments warrant a reminder at `now`: anything overdue, plus
    /// anything not complete whose due date falls inside the `due_soon`
    /// window.
    pub fn select<'a>(
        &self,
        assignments: &'a [Assignment],
        now: chrono::DateTime<chrono::Utc>,
    ) -> Vec<&'a Assignment> {
        assignments
            .iter()
            .filter(|a| match derive_display_status(a, now) {
                DisplayStatus::Complete => false,
                DisplayStatus::Overdue => true,
                _ => a.due_date - now <= self.config.due_soon,
            })
            .collect()
    }

    /// Run one dispatch pass over the roster.
    pub async fn run(
        &self,
        assignments: &[Assignment],
        now: chrono::DateTime<chrono::Utc>,
        observer: &dyn DispatchObserver,
    ) -> DispatchReport {
        let start = Instant::now();
        let selected = self.select(assignments, now);
        let selected_count = selected.len();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));

        let mut futures = FuturesUnordered::new();

        for assignment in selected {
            let notifier = Arc::clone(&self.notifier);
            let directory = Arc::clone(&self.directory);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();
            let assignment_id = assignment.id;
            let user_id = assignment.user_id;
            let induction_id = assignment.induction_id.clone();
            let status = derive_display_status(assignment, now);
            let due_date = assignment.due_date;

            futures.push(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (assignment_id, Err(anyhow::anyhow!("semaphore closed")));
                    }
                };

                let recipient = match directory.get_user(user_id).await {
                    Ok(user) => Some(user),
                    Err(e) => {
                        tracing::warn!("user lookup failed for {user_id}: {e:#}");
                        None
                    }
                };

                let request = ReminderRequest {
                    assignment_id,
                    user_id,
                    induction_id,
                    status,
                    due_date,
                    recipient,
                };

                // Retry on transient channel errors with exponential backoff
                let mut last_error = None;
                let mut retry_delay = config.retry_delay;
                for retry in 0..=config.max_retries {
                    if retry > 0 {
                        tokio::time::sleep(retry_delay).await;
                        retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
                    }
                    match notifier.send_reminder(&request).await {
                        Ok(receipt) => return (assignment_id, Ok(receipt)),
                        Err(e) => {
                            if let Some(notify) = e.downcast_ref::<NotifyError>() {
                                if notify.is_permanent() {
                                    return (assignment_id, Err(e));
                                }
                                // Use the channel's retry-after hint if present
                                if let Some(ms) = notify.retry_after_ms() {
                                    retry_delay = Duration::from_millis(ms);
                                }
                            }
                            last_error = Some(e);
                        }
                    }
                }

                (
                    assignment_id,
                    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error"))),
                )
            });
        }

        let mut sent = 0usize;
        let mut failed = 0usize;

        while let Some((assignment_id, result)) = futures.next().await {
            match result {
                Ok(receipt) => {
                    observer.on_reminder_sent(assignment_id, &receipt);
                    sent += 1;
                }
                Err(e) => {
                    tracing::error!("reminder failed for assignment {assignment_id}: {e:#}");
                    observer.on_reminder_error(assignment_id, &e.to_string());
                    failed += 1;
                }
            }
        }

        let report = DispatchReport {
            scanned: assignments.len(),
            selected: selected_count,
            sent,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        observer.on_run_complete(&report);
        report
    }
}
