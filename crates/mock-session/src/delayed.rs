//! Delayed session implementation - wraps another session with artificial latency.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use wa_session::{SendResult, Session, SessionError};

/// A session that wraps another session and delays every network operation.
///
/// Useful for exercising interleaving between concurrent call events.
pub struct DelayedSession<S: Session> {
    inner: S,
    delay: Duration,
}

impl<S: Session> DelayedSession<S> {
    /// Create a new DelayedSession wrapping the given session with the specified delay.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a session with a delay in milliseconds.
    pub fn with_millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<S: Session> Session for DelayedSession<S> {
    fn id(&self) -> i64 {
        self.inner.id()
    }

    async fn reject_call(&self, call_id: &str, from: &str) -> Result<(), SessionError> {
        sleep(self.delay).await;
        self.inner.reject_call(call_id, from).await
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<SendResult, SessionError> {
        sleep(self.delay).await;
        self.inner.send_text(to, text).await
    }
}
