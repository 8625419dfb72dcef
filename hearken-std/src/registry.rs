//! Guarded event-name → listener-list registry.
//!
//! The registry is the only shared mutable state of an emitter. Every
//! method takes the lock internally and releases it before returning, so
//! no listener ever runs while the lock is held.

use crate::observe;
use hearken_core::{EmitterError, Listener};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Thread-safe storage of listeners keyed by event name.
///
/// Listeners for one event keep their registration order.
#[derive(Default)]
pub struct Registry {
    events: Mutex<HashMap<String, Vec<Listener>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // Listeners never run under the lock, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Listener>>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a listener to the event's list, creating the list if needed.
    pub fn insert(&self, event: impl Into<String>, listener: Listener) {
        let event = event.into();
        observe::registered(&event, &listener);
        self.lock().entry(event).or_default().push(listener);
    }

    /// Remove the whole entry for `event`, returning its listeners.
    pub fn remove(&self, event: &str) -> Result<Vec<Listener>, EmitterError> {
        let removed = self.lock().remove(event);
        match removed {
            Some(listeners) => {
                observe::cleared(event, listeners.len());
                Ok(listeners)
            }
            None => Err(EmitterError::UnknownEvent(event.to_string())),
        }
    }

    /// Discard every entry.
    pub fn clear(&self) {
        let discarded = std::mem::take(&mut *self.lock());
        observe::reset(discarded.len());
    }

    /// Returns `true` if `event` currently has an entry.
    pub fn contains(&self, event: &str) -> bool {
        self.lock().contains_key(event)
    }

    /// Clone the listener list for `event`.
    ///
    /// Returns `None` if the name has no entry; a present entry is never
    /// empty.
    pub fn snapshot(&self, event: &str) -> Option<Vec<Listener>> {
        self.lock().get(event).cloned()
    }

    /// Number of listeners registered under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.lock().get(event).map_or(0, Vec::len)
    }

    /// Registered event names, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered event names.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no event has an entry.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("events", &self.event_names())
            .finish()
    }
}
