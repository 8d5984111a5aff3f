//! Mock session implementations for testing WhatsApp event handling.
//!
//! This crate provides in-memory implementations of the `Session` trait:
//! - `FakeSession` - Records every rejection and send, with switchable failures
//! - `DelayedSession` - Wraps another session with artificial latency
//!
//! # Example
//!
//! ```rust
//! use mock_session::{FakeSession, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wa_session::SessionError> {
//!     let session = FakeSession::new(3);
//!
//!     session.reject_call("ABC123", "551199999999:1@s.whatsapp.net").await?;
//!     assert_eq!(session.rejected().len(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod fake;

pub use wa_session::{CallOffer, ContactUpsert, Session, SessionError, SendResult};

pub use delayed::DelayedSession;
pub use fake::{FakeSession, RejectedCall, SentText};
