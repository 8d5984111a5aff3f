//! Error reporting for failures inside event handlers.

use tracing::error;

use crate::error::MonitorError;

/// Receives errors that were caught at the handler boundary.
///
/// Reporting is fire-and-forget and must not fail.
pub trait ErrorReporter: Send + Sync {
    /// Report an error. `context` names the stage that failed.
    fn capture(&self, context: &str, error: &MonitorError);
}

/// Reports errors to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn capture(&self, context: &str, error: &MonitorError) {
        error!("{}: {}", context, error);
    }
}
