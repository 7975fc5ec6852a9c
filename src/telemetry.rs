//! Best-effort log forwarding to an external aggregator.
//!
//! Forwarding is gated by the operator settings: the `send_logs` toggle plus
//! both credential fields. A sink with forwarding disabled is a no-op, so
//! callers can log unconditionally. Forwarding failures never propagate out
//! of the convenience level methods; telemetry must not break the host.

use crate::settings::Settings;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Header carrying the aggregator API key.
pub const TELEMETRY_API_KEY_HEADER: &str = "X-Api-Key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One forwarded log line, in the aggregator's intake shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub source: String,
    pub tags: String,
    pub message: String,
    pub service: String,
    pub level: String,
}

/// Forwards log lines over HTTP POST to the configured aggregator.
pub struct TelemetrySink {
    client: Client,
    settings: Settings,
    service: String,
    source: String,
}

impl TelemetrySink {
    /// Build a sink for `service` (the emitting tool) at `source` (the host
    /// site or installation identifier).
    pub fn new(
        settings: Settings,
        service: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, TelemetryError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            settings,
            service: service.into(),
            source: source.into(),
        })
    }

    /// Log at error level locally and forward.
    pub async fn error(&self, message: &str) {
        tracing::error!("{message}");
        self.forward_best_effort("error", message).await;
    }

    /// Log at warn level locally and forward.
    pub async fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        self.forward_best_effort("warning", message).await;
    }

    /// Log at info level locally and forward.
    pub async fn info(&self, message: &str) {
        tracing::info!("{message}");
        self.forward_best_effort("info", message).await;
    }

    /// Forward one line. Returns `Ok(false)` when forwarding is disabled or
    /// the credentials are incomplete (logged locally, nothing sent).
    pub async fn forward(&self, level: &str, message: &str) -> Result<bool, TelemetryError> {
        if !self.settings.send_logs {
            return Ok(false);
        }
        if !self.settings.telemetry_ready() {
            warn!(
                "Unable to forward logs to the aggregator. Provide an API url and API key in the \
                 formcore settings."
            );
            return Ok(false);
        }

        // telemetry_ready() guarantees both credentials are present
        let api_url = self.settings.api_url.as_deref().unwrap_or_default();
        let api_key = self.settings.api_key.as_deref().unwrap_or_default();

        let event = self.event(level, message);
        self.client
            .post(api_url)
            .header(TELEMETRY_API_KEY_HEADER, api_key)
            .json(&event)
            .send()
            .await?
            .error_for_status()?;
        Ok(true)
    }

    fn event(&self, level: &str, message: &str) -> LogEvent {
        LogEvent {
            source: self.source.clone(),
            tags: String::new(),
            message: message.to_string(),
            service: self.service.clone(),
            level: level.to_string(),
        }
    }

    async fn forward_best_effort(&self, level: &str, message: &str) {
        if let Err(err) = self.forward(level, message).await {
            warn!(error = %err, "Failed to forward log line to the aggregator");
        }
    }
}
