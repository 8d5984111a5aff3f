//! WhatsApp call monitor.
//!
//! When a company has calls disabled, the monitor rejects each incoming call,
//! and after a debounce window answers the caller with a fixed text and logs
//! a missed-call entry on the caller's existing ticket (reopening it if it was
//! closed). It also forwards `contacts.upsert` batches to the contact sync.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use call_monitor::{CallMonitor, DatabaseContactSync, MonitorConfig, SqliteCallStore};
//! use database::Database;
//! use wa_session::{BridgeClient, BridgeConfig, EventEmitter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:data/wbot.db?mode=rwc").await?;
//! db.migrate().await?;
//! let client = BridgeClient::connect(BridgeConfig::new("http://localhost:8085", 3)).await?;
//!
//! let monitor = CallMonitor::new(
//!     Arc::new(client.clone()),
//!     Arc::new(SqliteCallStore::new(db.clone())),
//!     Arc::new(DatabaseContactSync::new(db)),
//!     MonitorConfig::new(1),
//! );
//!
//! let emitter = EventEmitter::new();
//! monitor.attach(&emitter);
//! wa_session::pump_events(wa_session::subscribe(&client)?, &emitter).await;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod contacts;
pub mod debounce;
pub mod error;
pub mod monitor;
pub mod reporter;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{MonitorConfig, DEFAULT_DEBOUNCE_DELAY, DEFAULT_REJECT_MESSAGE};
pub use contacts::{ContactSync, DatabaseContactSync};
pub use debounce::{Debouncer, Trigger};
pub use error::MonitorError;
pub use monitor::{
    call_debounce_key, missed_call_body, phone_number_from_jid, CallMonitor, CallOutcome,
    MissedCallOutcome,
};
pub use reporter::{ErrorReporter, TracingReporter};
pub use store::{CallStore, SqliteCallStore};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
