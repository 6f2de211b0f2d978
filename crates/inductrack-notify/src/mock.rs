//! Mock notification channel for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use inductrack_core::error::NotifyError;
use inductrack_core::traits::{NotificationService, ReminderReceipt, ReminderRequest};

/// A mock channel for testing dispatch flows without real deliveries.
///
/// Succeeds by default; scripted failures are consumed front-to-back before
/// delivery succeeds again.
pub struct MockNotifier {
    /// Failures to return before succeeding.
    failures: Mutex<VecDeque<NotifyError>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<ReminderRequest>>,
}

impl MockNotifier {
    /// Create a mock that always succeeds.
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(VecDeque::new()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that fails with the given errors first, then succeeds.
    pub fn with_failures(failures: Vec<NotifyError>) -> Self {
        Self {
            failures: Mutex::new(failures.into()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this channel.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this channel.
    pub fn last_request(&self) -> Option<ReminderRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationService for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_reminder(&self, request: &ReminderRequest) -> anyhow::Result<ReminderReceipt> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(failure) = self.failures.lock().unwrap().pop_front() {
            return Err(failure.into());
        }

        Ok(ReminderReceipt {
            message_id: format!("mock-{}", self.call_count()),
            channel: "mock".into(),
        })
    }
}
