//! Channel configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use inductrack_core::dispatch::DispatchConfig;
use inductrack_core::traits::NotificationService;

use crate::console::ConsoleNotifier;
use crate::webhook::WebhookNotifier;

/// Configuration for a single notification channel.
///
/// Note: Custom Debug impl masks auth tokens to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelConfig {
    Webhook {
        endpoint: String,
        #[serde(default)]
        auth_token: Option<String>,
    },
    Console,
}

impl std::fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelConfig::Webhook {
                endpoint,
                auth_token: _,
            } => f
                .debug_struct("Webhook")
                .field("endpoint", endpoint)
                .field("auth_token", &"***")
                .finish(),
            ChannelConfig::Console => f.debug_struct("Console").finish(),
        }
    }
}

/// Top-level inductrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Channel configurations keyed by name.
    #[serde(default)]
    pub channels: HashMap<String, ChannelConfig>,
    /// Default channel to dispatch through.
    #[serde(default = "default_channel")]
    pub default_channel: String,
    /// Hours before the due date that trigger a pre-emptive reminder.
    #[serde(default = "default_due_soon_hours")]
    pub due_soon_hours: i64,
    /// Max retries on transient channel errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Max concurrent deliveries.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_channel() -> String {
    "console".to_string()
}
fn default_due_soon_hours() -> i64 {
    48
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_parallelism() -> usize {
    4
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
            default_channel: default_channel(),
            due_soon_hours: default_due_soon_hours(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            parallelism: default_parallelism(),
        }
    }
}

impl NotifyConfig {
    /// The dispatcher settings this configuration describes.
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            parallelism: self.parallelism,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            due_soon: chrono::Duration::hours(self.due_soon_hours),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a channel config.
fn resolve_channel_config(config: &ChannelConfig) -> ChannelConfig {
    match config {
        ChannelConfig::Webhook {
            endpoint,
            auth_token,
        } => ChannelConfig::Webhook {
            endpoint: resolve_env_vars(endpoint),
            auth_token: auth_token.as_ref().map(|t| resolve_env_vars(t)),
        },
        ChannelConfig::Console => ChannelConfig::Console,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `inductrack.toml` in the current directory
/// 2. `~/.config/inductrack/config.toml`
///
/// Environment variable override: `INDUCTRACK_WEBHOOK_TOKEN` replaces the
/// auth token of every webhook channel.
pub fn load_config() -> Result<NotifyConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<NotifyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("inductrack.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<NotifyConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => NotifyConfig::default(),
    };

    // Apply env var override
    if let Ok(token) = std::env::var("INDUCTRACK_WEBHOOK_TOKEN") {
        for channel in config.channels.values_mut() {
            if let ChannelConfig::Webhook { auth_token, .. } = channel {
                *auth_token = Some(token.clone());
            }
        }
    }

    // Resolve env vars in all channel configs
    let resolved: HashMap<String, ChannelConfig> = config
        .channels
        .iter()
        .map(|(k, v)| (k.clone(), resolve_channel_config(v)))
        .collect();
    config.channels = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("inductrack"))
}

/// Create a channel instance from its configuration.
pub fn create_notifier(config: &ChannelConfig) -> Result<Box<dyn NotificationService>> {
    match config {
        ChannelConfig::Webhook {
            endpoint,
            auth_token,
        } => Ok(Box::new(WebhookNotifier::new(
            endpoint,
            auth_token.clone(),
        ))),
        ChannelConfig::Console => Ok(Box::new(ConsoleNotifier)),
    }
}
