//! Recording session implementation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use wa_session::{SendResult, Session, SessionError};

/// A call rejection seen by [`FakeSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCall {
    pub call_id: String,
    pub from: String,
}

/// A text message sent through [`FakeSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub to: String,
    pub text: String,
}

#[derive(Debug, Default)]
struct State {
    rejected: Mutex<Vec<RejectedCall>>,
    sent: Mutex<Vec<SentText>>,
    fail_reject: AtomicBool,
    fail_send: AtomicBool,
    next_message: AtomicU64,
}

/// A session that records every operation instead of talking to WhatsApp.
///
/// Clones share the same record, so a test can keep one handle while the code
/// under test owns another.
#[derive(Debug, Clone)]
pub struct FakeSession {
    id: i64,
    state: Arc<State>,
}

impl FakeSession {
    /// Create a fake session for the given connection ID.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            state: Arc::new(State::default()),
        }
    }

    /// Make subsequent `reject_call` calls fail (or succeed again).
    pub fn fail_reject(&self, fail: bool) {
        self.state.fail_reject.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `send_text` calls fail (or succeed again).
    pub fn fail_send(&self, fail: bool) {
        self.state.fail_send.store(fail, Ordering::SeqCst);
    }

    /// Successful rejections so far, oldest first.
    pub fn rejected(&self) -> Vec<RejectedCall> {
        self.state
            .rejected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Successful sends so far, oldest first.
    pub fn sent(&self) -> Vec<SentText> {
        self.state
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Session for FakeSession {
    fn id(&self) -> i64 {
        self.id
    }

    async fn reject_call(&self, call_id: &str, from: &str) -> Result<(), SessionError> {
        if self.state.fail_reject.load(Ordering::SeqCst) {
            return Err(SessionError::RejectFailed(format!("call {} refused", call_id)));
        }

        self.state
            .rejected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RejectedCall {
                call_id: call_id.to_string(),
                from: from.to_string(),
            });
        Ok(())
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<SendResult, SessionError> {
        if self.state.fail_send.load(Ordering::SeqCst) {
            return Err(SessionError::SendFailed(format!("send to {} refused", to)));
        }

        self.state
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentText {
                to: to.to_string(),
                text: text.to_string(),
            });

        let n = self.state.next_message.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SendResult {
            message_id: Some(format!("FAKE{}", n)),
            timestamp: n,
        })
    }
}
