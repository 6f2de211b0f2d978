//! Webhook notification channel.
//!
//! Posts each reminder as JSON to a configured HTTP endpoint. Failures are
//! mapped onto [`NotifyError`] so the dispatcher can classify them for retry
//! decisions.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use inductrack_core::error::NotifyError;
use inductrack_core::traits::{NotificationService, ReminderReceipt, ReminderRequest};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delivers reminders to an HTTP endpoint.
pub struct WebhookNotifier {
    endpoint: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(endpoint: &str, auth_token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            auth_token,
            client,
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    #[serde(flatten)]
    reminder: &'a ReminderRequest,
}

#[derive(Deserialize)]
struct WebhookResponse {
    id: String,
}

#[derive(Deserialize)]
struct WebhookError {
    error: WebhookErrorBody,
}

#[derive(Deserialize)]
struct WebhookErrorBody {
    message: String,
}

#[async_trait]
impl NotificationService for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    #[instrument(skip(self, request), fields(assignment = %request.assignment_id))]
    async fn send_reminder(&self, request: &ReminderRequest) -> anyhow::Result<ReminderReceipt> {
        let start = Instant::now();

        let body = WebhookPayload {
            event: "assignment.reminder",
            reminder: request,
        };

        let mut http = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(token) = &self.auth_token {
            http = http.header("authorization", format!("Bearer {token}"));
        }

        let response = http.send().await.map_err(|e| {
            if e.is_timeout() {
                NotifyError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                NotifyError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(NotifyError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(NotifyError::UnknownRecipient(request.user_id.to_string()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<WebhookError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(NotifyError::DeliveryFailed { status, message }.into());
        }

        let api_response: WebhookResponse =
            response.json().await.map_err(|e| NotifyError::DeliveryFailed {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        tracing::debug!(
            message_id = %api_response.id,
            latency_ms = start.elapsed().as_millis() as u64,
            "reminder delivered"
        );

        Ok(ReminderReceipt {
            message_id: api_response.id,
            channel: "webhook".into(),
        })
    }
}
