//! Console notification channel.
//!
//! Prints each reminder instead of delivering it — the dry-run channel for
//! operators checking what a dispatch pass would send.

use async_trait::async_trait;

use inductrack_core::traits::{NotificationService, ReminderReceipt, ReminderRequest};

/// Writes reminders to stdout.
pub struct ConsoleNotifier;

#[async_trait]
impl NotificationService for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn send_reminder(&self, request: &ReminderRequest) -> anyhow::Result<ReminderReceipt> {
        let recipient = request
            .recipient
            .as_ref()
            .map(|user| format!("{} <{}>", user.name, user.email))
            .unwrap_or_else(|| request.user_id.to_string());

        println!(
            "REMINDER [{}] {} -> {} (due {})",
            request.status, request.induction_id, recipient, request.due_date
        );

        Ok(ReminderReceipt {
            message_id: format!("console-{}", request.assignment_id),
            channel: "console".into(),
        })
    }
}
