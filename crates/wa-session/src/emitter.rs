//! Event subscription for session events.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::types::{CallOffer, ContactUpsert, SessionEvent};

/// A registered handler for one kind of batch event.
pub type EventHandler<T> = Arc<dyn Fn(Vec<T>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap an async closure as an [`EventHandler`].
pub fn handler<T, F, Fut>(f: F) -> EventHandler<T>
where
    T: 'static,
    F: Fn(Vec<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |items| Box::pin(f(items)))
}

/// Something that delivers session events to registered handlers.
///
/// Handlers stay registered for the lifetime of the source.
pub trait EventSource: Send + Sync {
    /// Register a handler for incoming call batches.
    fn on_call(&self, handler: EventHandler<CallOffer>);

    /// Register a handler for contact upsert batches.
    fn on_contacts_upsert(&self, handler: EventHandler<ContactUpsert>);
}

#[derive(Default)]
struct Handlers {
    call: Vec<EventHandler<CallOffer>>,
    contacts_upsert: Vec<EventHandler<ContactUpsert>>,
}

/// In-process event source.
///
/// `emit` runs every handler of the event on its own tokio task, so a handler
/// that fails or panics cannot stop delivery of later events.
#[derive(Clone, Default)]
pub struct EventEmitter {
    handlers: Arc<RwLock<Handlers>>,
}

impl EventEmitter {
    /// Create an emitter with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to its handlers. Must be called within a tokio runtime.
    ///
    /// Returns the spawned handler tasks; callers may drop them.
    pub fn emit(&self, event: SessionEvent) -> Vec<JoinHandle<()>> {
        let name = event.name();
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);

        let tasks: Vec<JoinHandle<()>> = match event {
            SessionEvent::Call(calls) => handlers
                .call
                .iter()
                .map(|h| tokio::spawn(h(calls.clone())))
                .collect(),
            SessionEvent::ContactsUpsert(contacts) => handlers
                .contacts_upsert
                .iter()
                .map(|h| tokio::spawn(h(contacts.clone())))
                .collect(),
        };

        debug!("Dispatched {} event to {} handler(s)", name, tasks.len());
        tasks
    }

    /// Number of handlers registered for an event name.
    pub fn handler_count(&self, event: &str) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        match event {
            crate::types::CALL_EVENT => handlers.call.len(),
            crate::types::CONTACTS_UPSERT_EVENT => handlers.contacts_upsert.len(),
            _ => 0,
        }
    }
}

impl EventSource for EventEmitter {
    fn on_call(&self, handler: EventHandler<CallOffer>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .call
            .push(handler);
    }

    fn on_contacts_upsert(&self, handler: EventHandler<ContactUpsert>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .contacts_upsert
            .push(handler);
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("call_handlers", &self.handler_count(crate::types::CALL_EVENT))
            .field(
                "contacts_upsert_handlers",
                &self.handler_count(crate::types::CONTACTS_UPSERT_EVENT),
            )
            .finish()
    }
}
