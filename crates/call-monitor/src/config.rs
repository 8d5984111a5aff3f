//! Configuration for the call monitor.

use std::env;
use std::time::Duration;

use crate::error::MonitorError;

/// Default debounce window for call events (3 seconds).
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(3000);

/// Auto-reply sent to callers when calls are disabled.
pub const DEFAULT_REJECT_MESSAGE: &str = "*Mensagem Automática:*\nAs chamadas de voz e vídeo estão desabilitadas para este WhatsApp. Por favor, envie uma mensagem de texto.";

/// Configuration for the call monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Company whose settings and records the monitor works on.
    pub company_id: i64,

    /// Quiet period after the last call event before the missed-call action runs.
    /// Default: 3 seconds.
    pub debounce_delay: Duration,

    /// Text sent to the caller after a rejection.
    pub reject_message: String,
}

impl MonitorConfig {
    /// Create a config for a company with default timing and text.
    pub fn new(company_id: i64) -> Self {
        Self {
            company_id,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            reject_message: DEFAULT_REJECT_MESSAGE.to_string(),
        }
    }

    /// Override the debounce window.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `COMPANY_ID`
    ///
    /// Optional env vars:
    /// - `CALL_DEBOUNCE_MS` (default: 3000)
    /// - `CALL_REJECT_MESSAGE` (default: built-in Portuguese auto-reply)
    pub fn from_env() -> Result<Self, MonitorError> {
        let company_id = env::var("COMPANY_ID")
            .map_err(|_| MonitorError::Config("COMPANY_ID is required".into()))?
            .trim()
            .parse::<i64>()
            .map_err(|_| MonitorError::Config("invalid COMPANY_ID".into()))?;

        let mut config = Self::new(company_id);

        if let Ok(raw) = env::var("CALL_DEBOUNCE_MS") {
            let millis = raw.trim().parse::<u64>().map_err(|_| {
                let message = format!("CALL_DEBOUNCE_MS must be milliseconds, got {:?}", raw);
                MonitorError::Config(message)
            })?;
            config.debounce_delay = Duration::from_millis(millis);
        }

        if let Ok(message) = env::var("CALL_REJECT_MESSAGE") {
            if !message.trim().is_empty() {
                config.reject_message = message;
            }
        }

        Ok(config)
    }
}

/// Turn a SQLite path into a connection URL, leaving URLs untouched.
pub fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}
