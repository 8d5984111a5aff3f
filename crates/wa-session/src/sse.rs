//! Server-Sent Events (SSE) client for receiving session events.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::{Stream, StreamExt};
use reqwest_eventsource::retry::ExponentialBackoff;
use reqwest_eventsource::{Event, EventSource, RequestBuilderExt};
use tracing::{debug, error, info, warn};

use crate::client::BridgeClient;
use crate::emitter::EventEmitter;
use crate::error::SessionError;
use crate::types::SessionEvent;

/// Configuration for automatic reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of retries (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    fn retry_policy(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(
            self.initial_delay,
            self.backoff_multiplier,
            Some(self.max_delay),
            self.max_retries.map(|n| n as usize),
        )
    }
}

/// A stream of events from one WhatsApp connection.
pub struct EventStream {
    event_source: EventSource,
    reconnect_attempts: u32,
}

impl EventStream {
    /// Open the event stream of a bridge connection.
    pub fn new(client: &BridgeClient) -> Result<Self, SessionError> {
        Self::with_reconnect(client, ReconnectConfig::default())
    }

    /// Open the event stream with custom reconnection config.
    pub fn with_reconnect(
        client: &BridgeClient,
        reconnect_config: ReconnectConfig,
    ) -> Result<Self, SessionError> {
        let url = client.config().events_url();
        info!("Creating SSE connection to {}", url);

        // SSE connections are long-lived, so they get a client without timeout
        let sse_client = reqwest::Client::builder()
            .build()
            .map_err(SessionError::Http)?;

        let mut event_source = sse_client
            .get(&url)
            .eventsource()
            .map_err(|e| SessionError::Sse(e.to_string()))?;
        event_source.set_retry_policy(Box::new(reconnect_config.retry_policy()));

        Ok(Self {
            event_source,
            reconnect_attempts: 0,
        })
    }

    /// Close the underlying connection. The stream ends afterwards.
    pub fn close(&mut self) {
        self.event_source.close();
    }
}

impl Stream for EventStream {
    type Item = Result<SessionEvent, SessionError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.event_source).poll_next(cx) {
                Poll::Ready(Some(Ok(Event::Open))) => {
                    debug!("SSE connection opened");
                    self.reconnect_attempts = 0;
                }
                Poll::Ready(Some(Ok(Event::Message(msg)))) => {
                    match SessionEvent::from_frame(&msg.event, &msg.data) {
                        Ok(Some(event)) => return Poll::Ready(Some(Ok(event))),
                        Ok(None) => debug!("Ignoring SSE event type: {}", msg.event),
                        Err(e) => {
                            warn!("Failed to parse {} event data: {}", msg.event, e);
                            debug!("Raw data: {}", msg.data);
                            return Poll::Ready(Some(Err(SessionError::Json(e))));
                        }
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    self.reconnect_attempts += 1;
                    error!("SSE error: {} (attempt {})", e, self.reconnect_attempts);
                    return Poll::Ready(Some(Err(SessionError::Sse(e.to_string()))));
                }
                Poll::Ready(None) => {
                    info!("SSE stream ended");
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Open the event stream of a bridge connection.
pub fn subscribe(client: &BridgeClient) -> Result<EventStream, SessionError> {
    EventStream::new(client)
}

/// Forward every event of `stream` to `emitter` until the stream ends.
///
/// Stream errors are logged and skipped; reconnection is handled by the
/// stream's retry policy. Returns the number of events emitted.
pub async fn pump_events<S>(mut stream: S, emitter: &EventEmitter) -> u64
where
    S: Stream<Item = Result<SessionEvent, SessionError>> + Unpin,
{
    let mut emitted = 0u64;

    while let Some(result) = stream.next().await {
        match result {
            Ok(event) => {
                emitter.emit(event);
                emitted += 1;
            }
            Err(e) => {
                warn!("Event stream error: {}", e);
            }
        }
    }

    warn!("Event stream ended after {} events", emitted);
    emitted
}
