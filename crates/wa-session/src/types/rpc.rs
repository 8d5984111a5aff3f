//! JSON-RPC parameter and result types.

use serde::{Deserialize, Serialize};

/// Parameters for `rejectCall`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectCallParams {
    /// Connection the call arrived on.
    pub session: i64,
    pub call_id: String,
    /// Caller JID.
    pub from: String,
}

/// Parameters for `sendMessage` with a text body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTextParams {
    pub session: i64,
    /// Recipient JID.
    pub to: String,
    pub text: String,
}

/// Result of a successful send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    /// ID assigned to the outbound message, if any.
    #[serde(default)]
    pub message_id: Option<String>,

    /// Send timestamp (milliseconds since epoch).
    #[serde(default)]
    pub timestamp: u64,
}
