//! Relay runtime configuration.
//!
//! The webhook URL is resolved on every request rather than once at startup: a missing
//! or malformed URL is reported to the caller as a configuration error while the server
//! keeps running, so the value can be fixed without a restart. Everything else is
//! resolved once when the process starts.

use reqwest::Url;
use std::time::Duration;

use crate::error::{ConfigError, RelayError};

/// Environment variable holding the outbound webhook URL.
pub const WEBHOOK_URL_ENV: &str = "CARE_ASSESSMENT_WEBHOOK_URL";

/// Environment variable overriding the outbound request timeout, in seconds.
pub const WEBHOOK_TIMEOUT_ENV: &str = "RELAY_WEBHOOK_TIMEOUT_SECS";

pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the webhook URL comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookUrlSource {
    /// Read the named environment variable at request time.
    Env(String),
    /// A fixed value, `None` meaning unconfigured.
    Fixed(Option<String>),
}

impl WebhookUrlSource {
    fn raw(&self) -> Option<String> {
        match self {
            WebhookUrlSource::Env(name) => std::env::var(name).ok(),
            WebhookUrlSource::Fixed(value) => value.clone(),
        }
    }

    fn describe(&self) -> String {
        match self {
            WebhookUrlSource::Env(name) => name.clone(),
            WebhookUrlSource::Fixed(_) => "relay configuration".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    webhook_url: WebhookUrlSource,
    webhook_timeout: Duration,
}

impl RelayConfig {
    pub fn new(webhook_url: WebhookUrlSource, webhook_timeout: Duration) -> Self {
        Self {
            webhook_url,
            webhook_timeout,
        }
    }

    /// Configuration backed by the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTimeout`] if `RELAY_WEBHOOK_TIMEOUT_SECS` is set but
    /// is not a positive whole number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_timeout = webhook_timeout_from_env_value(std::env::var(WEBHOOK_TIMEOUT_ENV).ok())?;
        Ok(Self::new(
            WebhookUrlSource::Env(WEBHOOK_URL_ENV.into()),
            webhook_timeout,
        ))
    }

    /// Configuration with a fixed webhook URL and the default timeout.
    pub fn with_webhook_url(url: Option<String>) -> Self {
        Self::new(WebhookUrlSource::Fixed(url), DEFAULT_WEBHOOK_TIMEOUT)
    }

    pub fn webhook_timeout(&self) -> Duration {
        self.webhook_timeout
    }

    /// Resolve and check the webhook URL for one request.
    ///
    /// # Errors
    /// - [`RelayError::MissingWebhookUrl`] if no value is set or it is blank
    /// - [`RelayError::InvalidWebhookUrl`] if it is not an absolute http(s) URL
    pub fn webhook_url(&self) -> Result<Url, RelayError> {
        let raw = self
            .webhook_url
            .raw()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RelayError::MissingWebhookUrl {
                source_name: self.webhook_url.describe(),
            })?;

        let url = Url::parse(&raw).map_err(|e| RelayError::InvalidWebhookUrl {
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(RelayError::InvalidWebhookUrl {
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }
}

/// Parse the webhook timeout from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_WEBHOOK_TIMEOUT`].
pub fn webhook_timeout_from_env_value(value: Option<String>) -> Result<Duration, ConfigError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let Some(value) = value else {
        return Ok(DEFAULT_WEBHOOK_TIMEOUT);
    };

    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(value)),
    }
}
