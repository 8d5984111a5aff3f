//! WhatsApp session abstraction and bridge client.
//!
//! This crate models one live WhatsApp connection as seen by the service
//! desk. It provides:
//!
//! - The [`Session`] trait: connection ID, call rejection, text sending
//! - The [`EventSource`] trait and the in-process [`EventEmitter`] for
//!   `call` and `contacts.upsert` events
//! - [`BridgeClient`], a JSON-RPC client for the WhatsApp bridge sidecar,
//!   plus an SSE [`EventStream`] of its events
//!
//! # Example
//!
//! ```no_run
//! use wa_session::{BridgeClient, BridgeConfig, EventEmitter, EventSource, Session, handler};
//! use wa_session::types::CallOffer;
//!
//! # async fn example() -> Result<(), wa_session::SessionError> {
//! let client = BridgeClient::connect(BridgeConfig::new("http://localhost:8085", 3)).await?;
//! client.send_text("551199999999@s.whatsapp.net", "Olá!").await?;
//!
//! let emitter = EventEmitter::new();
//! emitter.on_call(handler(|calls: Vec<CallOffer>| async move {
//!     println!("{} incoming call(s)", calls.len());
//! }));
//!
//! let stream = wa_session::subscribe(&client)?;
//! wa_session::pump_events(stream, &emitter).await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod emitter;
pub mod error;
pub mod session;
pub mod sse;
pub mod types;

pub use client::BridgeClient;
pub use config::BridgeConfig;
pub use emitter::{handler, EventEmitter, EventHandler, EventSource};
pub use error::SessionError;
pub use session::Session;
pub use sse::{pump_events, subscribe, EventStream, ReconnectConfig};
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
