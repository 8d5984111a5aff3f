//! Error types for call monitoring.

use database::DatabaseError;
use thiserror::Error;
use wa_session::SessionError;

/// Errors that can occur while handling session events.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Error from the WhatsApp session.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the persistence layer.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
