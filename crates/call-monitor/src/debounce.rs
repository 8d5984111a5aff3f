//! Keyed trailing-edge debounce.
//!
//! A [`Debouncer`] owns a registry of pending timers, one per key. Triggering
//! a key cancels its pending timer and schedules a new one; when a timer
//! expires its entry is removed and the action is spawned without being
//! awaited. Keys are independent of each other.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// A reusable debounced action.
pub type DebouncedAction = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

struct Pending {
    generation: u64,
    timer: JoinHandle<()>,
}

struct Registry<K> {
    pending: HashMap<K, Pending>,
    next_generation: u64,
}

/// Registry of pending debounce timers keyed by `K`.
///
/// Clones share the same registry. Must be used within a tokio runtime.
pub struct Debouncer<K> {
    registry: Arc<Mutex<Registry<K>>>,
}

impl<K> Clone for Debouncer<K> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                pending: HashMap::new(),
                next_generation: 0,
            })),
        }
    }
}

impl<K: Eq + Hash> Registry<K> {
    /// Remove the entry for `key` if it still belongs to `generation`.
    fn expire(&mut self, key: &K, generation: u64) -> bool {
        match self.pending.get(key) {
            Some(pending) if pending.generation == generation => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }
}

fn lock<K>(registry: &Mutex<Registry<K>>) -> MutexGuard<'_, Registry<K>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + std::fmt::Debug + 'static,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run `delay` after now, replacing any pending
    /// schedule for `key`. Returns immediately.
    pub fn trigger<F, Fut>(&self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut registry = lock(&self.registry);

        registry.next_generation += 1;
        let generation = registry.next_generation;

        if let Some(previous) = registry.pending.remove(&key) {
            previous.timer.abort();
            debug!("Debounce for {:?} superseded", key);
        }

        let deadline = Instant::now() + delay;
        let shared = Arc::clone(&self.registry);
        let timer_key = key.clone();
        let timer = tokio::spawn(async move {
            sleep_until(deadline).await;

            // A newer trigger owns the key.
            if !lock(&shared).expire(&timer_key, generation) {
                return;
            }

            debug!("Debounce for {:?} fired", timer_key);
            tokio::spawn(action());
        });

        registry.pending.insert(key, Pending { generation, timer });
    }

    /// Bind an action, a delay and a key into a reusable trigger.
    pub fn debounce<F, Fut>(&self, action: F, delay: Duration, key: K) -> Trigger<K>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Trigger {
            debouncer: self.clone(),
            action: Arc::new(move || Box::pin(action())),
            delay,
            key,
        }
    }

    /// Whether a timer is pending for `key`.
    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.registry).pending.contains_key(key)
    }

    /// Number of keys with a pending timer.
    pub fn pending_count(&self) -> usize {
        lock(&self.registry).pending.len()
    }

    /// Cancel the pending timer for `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        match lock(&self.registry).pending.remove(key) {
            Some(pending) => {
                pending.timer.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer. Returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let mut registry = lock(&self.registry);
        let count = registry.pending.len();
        for (_, pending) in registry.pending.drain() {
            pending.timer.abort();
        }
        count
    }
}

impl<K> std::fmt::Debug for Debouncer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &lock(&self.registry).pending.len())
            .finish()
    }
}

/// A debounced action bound to one key. See [`Debouncer::debounce`].
#[derive(Clone)]
pub struct Trigger<K> {
    debouncer: Debouncer<K>,
    action: DebouncedAction,
    delay: Duration,
    key: K,
}

impl<K> Trigger<K>
where
    K: Eq + Hash + Clone + Send + std::fmt::Debug + 'static,
{
    /// (Re)start the timer for this trigger's key.
    pub fn fire(&self) {
        let action = Arc::clone(&self.action);
        self.debouncer
            .trigger(self.key.clone(), self.delay, move || action());
    }

    /// The key this trigger debounces on.
    pub fn key(&self) -> &K {
        &self.key
    }
}
