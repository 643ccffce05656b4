//! Observer Registry
//!
//! Observers are refresh callbacks run once per committed tick with the
//! freshly published snapshot.
//!
//! # Failure Isolation
//!
//! A panicking observer is caught, logged, and skipped. The remaining
//! observers still run and the tick is not aborted.
//!
//! # Re-entrancy
//!
//! Callbacks run after the registry lock has been released, so an observer
//! may subscribe or unsubscribe (itself included) while being notified.
//! Changes take effect from the next notification.
//!
//! # Closing
//!
//! `close` releases every callback and turns the registry off for good. A
//! notification already in flight stops before its next callback, and later
//! subscriptions are dropped unregistered.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::warn;

use super::snapshot::LayoutSnapshot;

/// Unique identifier for an observer registration.
///
/// Subscribing the same callback twice yields two registrations with
/// distinct IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Generate a new unique observer ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

type Callback = Arc<dyn Fn(&LayoutSnapshot) + Send + Sync>;

/// Insertion-ordered set of refresh callbacks.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<IndexMap<ObserverId, Callback>>,

    /// Set once by `close`, only while holding `observers`.
    closed: AtomicBool,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. No deduplication is performed.
    ///
    /// On a closed registry the observer is dropped without being registered.
    pub fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&LayoutSnapshot) + Send + Sync + 'static,
    {
        let id = ObserverId::new();
        let mut observers = self.observers.lock();
        if !self.is_closed() {
            observers.insert(id, Arc::new(observer));
        }
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.lock().shift_remove(&id).is_some()
    }

    /// Notify every observer in subscription order.
    ///
    /// Returns the number of observers that panicked.
    pub fn notify(&self, snapshot: &LayoutSnapshot) -> usize {
        let observers: Vec<(ObserverId, Callback)> = self
            .observers
            .lock()
            .iter()
            .map(|(id, callback)| (*id, Arc::clone(callback)))
            .collect();

        let mut failures = 0;
        for (id, callback) in observers {
            if self.is_closed() {
                break;
            }
            if panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot))).is_err() {
                failures += 1;
                warn!(observer = ?id, tick = snapshot.tick(), "observer panicked during refresh");
            }
        }
        failures
    }

    /// Drop every registration, releasing the callbacks.
    pub fn clear(&self) {
        self.observers.lock().clear();
    }

    /// Release every callback and stop accepting or notifying observers.
    pub fn close(&self) {
        let mut observers = self.observers.lock();
        self.closed.store(true, Ordering::SeqCst);
        observers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.lock().is_empty()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}
