//! The Session trait definition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SessionError;
use crate::types::SendResult;

/// An active connection to one WhatsApp account.
///
/// Implementations range from the HTTP bridge client to in-memory fakes.
/// This trait is object-safe and can be used with `Arc<dyn Session>`.
#[async_trait]
pub trait Session: Send + Sync {
    /// WhatsApp connection ID.
    fn id(&self) -> i64;

    /// Reject an incoming call.
    ///
    /// # Arguments
    /// * `call_id` - Provider call ID
    /// * `from` - Caller JID as reported with the call
    async fn reject_call(&self, call_id: &str, from: &str) -> Result<(), SessionError>;

    /// Send a text message.
    ///
    /// # Arguments
    /// * `to` - Recipient JID
    /// * `text` - Message content
    async fn send_text(&self, to: &str, text: &str) -> Result<SendResult, SessionError>;
}

#[async_trait]
impl<S: Session + ?Sized> Session for Arc<S> {
    fn id(&self) -> i64 {
        (**self).id()
    }

    async fn reject_call(&self, call_id: &str, from: &str) -> Result<(), SessionError> {
        (**self).reject_call(call_id, from).await
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<SendResult, SessionError> {
        (**self).send_text(to, text).await
    }
}
