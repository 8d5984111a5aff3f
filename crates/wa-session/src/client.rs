//! WhatsApp bridge HTTP client.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::BridgeConfig;
use crate::error::SessionError;
use crate::session::Session;
use crate::types::{RejectCallParams, SendResult, SendTextParams};

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Serialize)]
struct RpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<T>,
    id: u64,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<RpcError>,
    #[allow(dead_code)]
    id: u64,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Client for one WhatsApp connection served by the bridge sidecar.
#[derive(Clone)]
pub struct BridgeClient {
    http: Client,
    config: BridgeConfig,
    request_id: Arc<AtomicU64>,
    connected: Arc<AtomicBool>,
}

impl BridgeClient {
    /// Connect to the bridge.
    pub async fn connect(config: BridgeConfig) -> Result<Self, SessionError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SessionError::Http)?;

        let client = Self {
            http,
            config,
            request_id: Arc::new(AtomicU64::new(1)),
            connected: Arc::new(AtomicBool::new(false)),
        };

        // Verify connection with health check
        if client.health_check().await? {
            client.connected.store(true, Ordering::SeqCst);
            info!(
                "Connected to WhatsApp bridge at {} (session {})",
                client.config.base_url, client.config.session_id
            );
        } else {
            return Err(SessionError::HealthCheckFailed);
        }

        Ok(client)
    }

    /// Check if currently connected to the bridge.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Perform a health check against the bridge.
    pub async fn health_check(&self) -> Result<bool, SessionError> {
        let url = self.config.check_url();
        debug!("Health check: {}", url);

        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                self.connected.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(SessionError::Http(e))
            }
        }
    }

    /// Start a background health monitor that periodically checks the bridge.
    pub fn start_health_monitor(&self, interval: Duration) -> JoinHandle<()> {
        let client = self.clone();

        tokio::spawn(async move {
            let mut consecutive_failures = 0u32;

            loop {
                tokio::time::sleep(interval).await;

                match client.health_check().await {
                    Ok(true) => {
                        if consecutive_failures > 0 {
                            info!("Bridge connection restored");
                        }
                        consecutive_failures = 0;
                    }
                    Ok(false) => {
                        consecutive_failures += 1;
                        warn!(
                            "Health check returned not OK (failures: {})",
                            consecutive_failures
                        );
                    }
                    Err(e) => {
                        consecutive_failures += 1;
                        error!(
                            "Health check failed: {} (failures: {})",
                            e, consecutive_failures
                        );
                    }
                }
            }
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Make a JSON-RPC call to the bridge.
    async fn rpc_call<P: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, SessionError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let url = self.config.rpc_url();

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!("RPC call: {} (id={})", method, id);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(SessionError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Connection(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let rpc_response: RpcResponse<R> = response.json().await.map_err(SessionError::Http)?;

        if let Some(error) = rpc_response.error {
            return Err(SessionError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| SessionError::Rpc {
                code: -1,
                message: "No result in response".to_string(),
            })
    }
}

#[async_trait]
impl Session for BridgeClient {
    fn id(&self) -> i64 {
        self.config.session_id
    }

    async fn reject_call(&self, call_id: &str, from: &str) -> Result<(), SessionError> {
        let params = RejectCallParams {
            session: self.config.session_id,
            call_id: call_id.to_string(),
            from: from.to_string(),
        };

        let _: serde_json::Value = self
            .rpc_call("rejectCall", Some(params))
            .await
            .map_err(|e| SessionError::RejectFailed(e.to_string()))?;
        Ok(())
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<SendResult, SessionError> {
        let params = SendTextParams {
            session: self.config.session_id,
            to: to.to_string(),
            text: text.to_string(),
        };

        self.rpc_call("sendMessage", Some(params))
            .await
            .map_err(|e| SessionError::SendFailed(e.to_string()))
    }
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}
