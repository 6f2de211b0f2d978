//! Collaborator trait definitions.
//!
//! The engine performs no I/O itself. Identity, induction storage,
//! notification delivery, and file storage are opaque request/response
//! collaborators implemented elsewhere (`inductrack-notify` ships the
//! notification channels); each may fail independently of the engine and
//! those failures are never conflated with the domain taxonomy in
//! [`crate::error::LifecycleError`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Induction;
use crate::results::DisplayStatus;

// ---------------------------------------------------------------------------
// Identity and induction storage
// ---------------------------------------------------------------------------

/// Directory of the people inductions are assigned to.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: Uuid) -> anyhow::Result<UserRecord>;
}

/// A directory entry for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: String,
}

/// Storage of induction definitions.
#[async_trait]
pub trait InductionCatalog: Send + Sync {
    async fn get_induction(&self, id: &str) -> anyhow::Result<Induction>;
}

// ---------------------------------------------------------------------------
// Notification delivery
// ---------------------------------------------------------------------------

/// A channel that can deliver assignment reminders.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Human-readable channel name (e.g. "webhook").
    fn name(&self) -> &str;

    /// Deliver one reminder.
    async fn send_reminder(&self, request: &ReminderRequest) -> anyhow::Result<ReminderReceipt>;
}

/// Everything a channel needs to render and address one reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub induction_id: String,
    pub status: DisplayStatus,
    pub due_date: DateTime<Utc>,
    /// Resolved recipient, when the directory lookup succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserRecord>,
}

/// Proof of delivery from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReceipt {
    /// Channel-assigned message identifier.
    pub message_id: String,
    /// Which channel delivered it.
    pub channel: String,
}

// ---------------------------------------------------------------------------
// File storage
// ---------------------------------------------------------------------------

/// Opaque storage for uploaded answer evidence.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// A time-limited download URL for a stored file.
    async fn get_signed_url(&self, path: &str) -> anyhow::Result<String>;

    /// Store bytes under `path`, returning the canonical stored path.
    async fn upload(&self, path: &str, bytes: &[u8]) -> anyhow::Result<String>;

    async fn delete(&self, path: &str) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// File reference normalization
// ---------------------------------------------------------------------------

/// Normalize a user-supplied file reference into a storage path.
///
/// Handles:
/// - surrounding whitespace and repeated or leading separators
/// - backslash separators from Windows-originated uploads
/// - `.` segments (dropped) and `..` segments (rejected outright)
///
/// Returns `None` when nothing usable remains or the reference tries to
/// climb out of the storage root.
pub fn normalize_file_ref(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace('\\', "/");
    let mut segments = Vec::new();
    for segment in cleaned.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_plain_path() {
        assert_eq!(
            normalize_file_ref("uploads/cert.pdf"),
            Some("uploads/cert.pdf".to_string())
        );
    }

    #[test]
    fn normalize_strips_leading_and_doubled_separators() {
        assert_eq!(
            normalize_file_ref("//uploads///cert.pdf"),
            Some("uploads/cert.pdf".to_string())
        );
        assert_eq!(
            normalize_file_ref("  /uploads/cert.pdf  "),
            Some("uploads/cert.pdf".to_string())
        );
    }

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(
            normalize_file_ref("uploads\\2024\\cert.pdf"),
            Some("uploads/2024/cert.pdf".to_string())
        );
    }

    #[test]
    fn normalize_drops_current_dir_segments() {
        assert_eq!(
            normalize_file_ref("./uploads/./cert.pdf"),
            Some("uploads/cert.pdf".to_string())
        );
    }

    #[test]
    fn normalize_rejects_traversal() {
        assert_eq!(normalize_file_ref("../etc/passwd"), None);
        assert_eq!(normalize_file_ref("uploads/../../secret"), None);
    }

    #[test]
    fn normalize_rejects_empty() {
        assert_eq!(normalize_file_ref(""), None);
        assert_eq!(normalize_file_ref("   "), None);
        assert_eq!(normalize_file_ref("///"), None);
    }
}
