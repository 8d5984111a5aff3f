//! Configuration types for wa-session.

use std::env;

use crate::error::SessionError;

/// Default bridge address used when `WA_BRIDGE_URL` is not set.
pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:8085";

/// Configuration for connecting to the WhatsApp bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the bridge HTTP server (e.g., "http://localhost:8085").
    pub base_url: String,
    /// WhatsApp connection ID served by the bridge.
    pub session_id: i64,
}

impl BridgeConfig {
    /// Create a new configuration for one connection.
    pub fn new(base_url: impl Into<String>, session_id: i64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_id,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `WA_SESSION_ID` (numeric connection ID)
    ///
    /// Optional env vars:
    /// - `WA_BRIDGE_URL` (default: http://127.0.0.1:8085)
    pub fn from_env() -> Result<Self, SessionError> {
        let base_url = env::var("WA_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.to_string());
        let raw_id = env::var("WA_SESSION_ID")
            .map_err(|_| SessionError::Config("WA_SESSION_ID is required".to_string()))?;
        let session_id = parse_session_id(&raw_id)?;

        Ok(Self::new(base_url, session_id))
    }

    /// Get the RPC endpoint URL.
    pub fn rpc_url(&self) -> String {
        format!("{}/api/v1/rpc", self.base_url)
    }

    /// Get the events endpoint URL for this connection.
    pub fn events_url(&self) -> String {
        format!("{}/api/v1/events?session={}", self.base_url, self.session_id)
    }

    /// Get the health check endpoint URL.
    pub fn check_url(&self) -> String {
        format!("{}/api/v1/check", self.base_url)
    }
}

fn parse_session_id(raw: &str) -> Result<i64, SessionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SessionError::Config(format!("WA_SESSION_ID must be numeric, got {:?}", raw)))
}
