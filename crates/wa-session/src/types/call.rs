//! Call event types.

use serde::{Deserialize, Serialize};

/// State of a call as reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Offer,
    Ringing,
    Timeout,
    Reject,
    Accept,
    #[serde(other)]
    Other,
}

/// An incoming call descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOffer {
    /// Provider call ID (e.g., "ABC123").
    pub id: String,

    /// Caller JID, possibly with a device suffix (e.g., "551199999999:1@s.whatsapp.net").
    pub from: String,

    /// Call state.
    #[serde(default)]
    pub status: CallStatus,

    /// Whether this is a video call.
    #[serde(default)]
    pub is_video: bool,

    /// Whether this is a group call.
    #[serde(default)]
    pub is_group: bool,
}

impl CallOffer {
    /// Create a voice call offer.
    pub fn new(id: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            ..Default::default()
        }
    }
}
