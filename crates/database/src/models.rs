//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Setting key controlling whether voice/video calls are accepted.
pub const CALL_SETTING_KEY: &str = "call";

/// Setting value that makes the monitor reject incoming calls.
pub const CALL_SETTING_DISABLED: &str = "disabled";

/// Setting value that lets calls ring through.
pub const CALL_SETTING_ENABLED: &str = "enabled";

/// Media type recorded on messages synthesized from call events.
pub const CALL_LOG_MEDIA_TYPE: &str = "call_log";

/// A per-company key/value setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Setting {
    /// Owning company.
    pub company_id: i64,
    /// Setting key (e.g., "call").
    pub key: String,
    /// Setting value (e.g., "enabled", "disabled").
    pub value: String,
}

/// A customer contact, unique per `(company_id, number)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning company.
    pub company_id: i64,
    /// Phone number without JID suffix (e.g., "551199999999").
    pub number: String,
    /// Display name.
    pub name: String,
}

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Pending,
    Closed,
}

impl TicketStatus {
    /// Database/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "pending" => Ok(TicketStatus::Pending),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(format!("unknown ticket status: {}", other)),
        }
    }
}

/// A customer-service conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Contact the ticket belongs to.
    pub contact_id: i64,
    /// WhatsApp connection the ticket is served through.
    pub whatsapp_id: i64,
    /// Owning company.
    pub company_id: i64,
    /// Current status.
    pub status: TicketStatus,
    /// Preview of the latest message.
    pub last_message: String,
}

/// Partial update applied to a ticket. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    pub last_message: Option<String>,
    pub status: Option<TicketStatus>,
}

/// A persisted message log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Message ID (provider-assigned, e.g. the call ID for call logs).
    pub id: String,
    pub ticket_id: i64,
    pub contact_id: i64,
    pub company_id: i64,
    pub body: String,
    pub from_me: bool,
    /// Media type ("chat", "call_log", ...).
    pub media_type: String,
    pub read: bool,
    /// Delivery acknowledgement level.
    pub ack: i64,
    pub quoted_msg_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Insert form of [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub id: String,
    pub ticket_id: i64,
    pub contact_id: i64,
    pub body: String,
    pub from_me: bool,
    pub media_type: String,
    pub read: bool,
    pub ack: i64,
    pub quoted_msg_id: Option<String>,
}

impl NewMessage {
    /// A missed-call log entry: inbound, already read, acked once, no quote.
    pub fn call_log(
        call_id: impl Into<String>,
        ticket_id: i64,
        contact_id: i64,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: call_id.into(),
            ticket_id,
            contact_id,
            body: body.into(),
            from_me: false,
            media_type: CALL_LOG_MEDIA_TYPE.to_string(),
            read: true,
            ack: 1,
            quoted_msg_id: None,
        }
    }
}

/// A contact as reported by a WhatsApp session, kept per connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionContact {
    /// WhatsApp connection the contact was synced from.
    pub whatsapp_id: i64,
    /// Contact JID (e.g., "551199999999@s.whatsapp.net").
    pub jid: String,
    /// Name from the address book, if known.
    pub name: Option<String>,
    /// Push name chosen by the contact, if known.
    pub notify: Option<String>,
}

/// A subscription plan offered to companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Plan {
    /// Auto-incrementing ID (ignored on create).
    pub id: i64,
    pub name: String,
    /// Maximum number of users.
    pub users: i64,
    /// Maximum number of WhatsApp connections.
    pub connections: i64,
    /// Maximum number of queues.
    pub queues: i64,
    /// Monthly price.
    pub value: f64,
    pub use_campaigns: bool,
    pub use_schedules: bool,
    pub use_internal_chat: bool,
    pub use_external_api: bool,
    pub use_kanban: bool,
    pub use_open_ai: bool,
    pub use_integrations: bool,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            users: 0,
            connections: 0,
            queues: 0,
            value: 0.0,
            use_campaigns: true,
            use_schedules: true,
            use_internal_chat: true,
            use_external_api: true,
            use_kanban: true,
            use_open_ai: true,
            use_integrations: true,
        }
    }
}
