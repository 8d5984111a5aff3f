//! Session events.

use serde::de::DeserializeOwned;

use super::{CallOffer, ContactUpsert};

/// SSE event name for incoming calls.
pub const CALL_EVENT: &str = "call";

/// SSE event name for contact sync batches.
pub const CONTACTS_UPSERT_EVENT: &str = "contacts.upsert";

/// An event reported by a WhatsApp session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One or more incoming calls.
    Call(Vec<CallOffer>),
    /// A batch of created or updated contacts.
    ContactsUpsert(Vec<ContactUpsert>),
}

impl SessionEvent {
    /// Decode a bridge frame.
    ///
    /// `data` is the JSON array carried by the frame. Unknown event names
    /// decode to `Ok(None)`.
    pub fn from_frame(event: &str, data: &str) -> Result<Option<Self>, serde_json::Error> {
        match event {
            CALL_EVENT => decode(data).map(|calls| Some(SessionEvent::Call(calls))),
            CONTACTS_UPSERT_EVENT => {
                decode(data).map(|contacts| Some(SessionEvent::ContactsUpsert(contacts)))
            }
            _ => Ok(None),
        }
    }

    /// The event name this event travels under.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Call(_) => CALL_EVENT,
            SessionEvent::ContactsUpsert(_) => CONTACTS_UPSERT_EVENT,
        }
    }
}

fn decode<T: DeserializeOwned>(data: &str) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_str(data)
}
