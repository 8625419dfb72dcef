//! Testing utilities for Hearken.
//!
//! This module provides listeners that make it easy to observe what an
//! emitter does with them.
//!
//! # Features
//!
//! - [`RecordingListener`]: records every payload it receives
//! - [`CountingListener`]: counts invocations
//! - [`SpyListener`]: records payloads and can be told to fail

use hearken_core::{Arity, Listener, ListenerError, Payload, Value, Values};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records every payload it receives.
///
/// # Example
///
/// ```rust
/// use hearken_core::{Arity, payload};
/// use hearken_std::{emitter::EventEmitter, testing::RecordingListener};
///
/// let recorder = RecordingListener::new();
/// let emitter = EventEmitter::new();
/// emitter.on("evt", recorder.listener(Arity::Exact(1)));
///
/// emitter.fire("evt", payload![7_u32]).unwrap();
/// assert_eq!(recorder.count(), 1);
/// assert_eq!(recorder.payloads()[0][0].downcast_ref::<u32>(), Some(&7));
/// ```
#[derive(Clone, Default)]
pub struct RecordingListener {
    payloads: Arc<Mutex<Vec<Payload>>>,
    output: Option<Value>,
}

impl RecordingListener {
    /// Create a recorder whose listeners return nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder whose listeners return `value`.
    pub fn returning(value: Value) -> Self {
        Self {
            payloads: Arc::default(),
            output: Some(value),
        }
    }

    /// Build a listener with the given arity that records into this recorder.
    pub fn listener(&self, arity: Arity) -> Listener {
        let payloads = Arc::clone(&self.payloads);
        let output = self.output.clone();
        Listener::from_parts(arity, "RecordingListener", move |payload| {
            lock(&payloads).push(payload.clone());
            Ok(output.iter().cloned().collect())
        })
    }

    /// Get a clone of the recorded payloads.
    pub fn payloads(&self) -> Vec<Payload> {
        lock(&self.payloads).clone()
    }

    /// Get the number of recorded payloads.
    pub fn count(&self) -> usize {
        lock(&self.payloads).len()
    }

    /// Clear all recorded payloads.
    pub fn clear(&self) {
        lock(&self.payloads).clear();
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a listener with the given arity that increments this counter.
    ///
    /// The listener returns the count after its own increment.
    pub fn listener(&self, arity: Arity) -> Listener {
        let count = Arc::clone(&self.count);
        Listener::from_parts(arity, "CountingListener", move |_| {
            let n = count.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Values::from_return(n))
        })
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

// ============================================================================
// Spy Listener
// ============================================================================

/// A listener that records payloads and can be programmed to fail.
#[derive(Clone, Default)]
pub struct SpyListener {
    inputs: Arc<Mutex<Vec<Payload>>>,
    should_error: Arc<Mutex<Option<String>>>,
}

impl SpyListener {
    /// Create a new spy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail with `error`.
    pub fn set_error(&self, error: impl Into<String>) {
        *lock(&self.should_error) = Some(error.into());
    }

    /// Clear error state.
    pub fn clear_error(&self) {
        *lock(&self.should_error) = None;
    }

    /// Build a listener with the given arity that reports to this spy.
    ///
    /// On success the listener echoes its payload back as its results.
    pub fn listener(&self, arity: Arity) -> Listener {
        let spy = self.clone();
        Listener::from_parts(arity, "SpyListener", move |payload| {
            lock(&spy.inputs).push(payload.clone());
            if let Some(ref err) = *lock(&spy.should_error) {
                return Err(ListenerError::Custom(err.clone().into()));
            }
            Ok(payload.iter().cloned().collect())
        })
    }

    /// Get recorded inputs.
    pub fn inputs(&self) -> Vec<Payload> {
        lock(&self.inputs).clone()
    }

    /// Get the number of times a spy listener was called.
    pub fn call_count(&self) -> usize {
        lock(&self.inputs).len()
    }
}
