//! Structured log points.
//!
//! Compiled to no-ops when the `tracing` feature is disabled.

use hearken_core::{Listener, ListenerError};
use std::io;

pub(crate) fn registered(event: &str, listener: &Listener) {
    #[cfg(feature = "tracing")]
    tracing::debug!(event, arity = %listener.arity(), listener = listener.name(), "listener registered");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, listener);
}

pub(crate) fn cleared(event: &str, listeners: usize) {
    #[cfg(feature = "tracing")]
    tracing::debug!(event, listeners, "event cleared");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, listeners);
}

pub(crate) fn reset(events: usize) {
    #[cfg(feature = "tracing")]
    tracing::debug!(events, "all events cleared");
    #[cfg(not(feature = "tracing"))]
    let _ = events;
}

pub(crate) fn skipped(event: &str, listener: &Listener, payload_len: usize) {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        event,
        arity = %listener.arity(),
        payload_len,
        listener = listener.name(),
        "listener skipped: arity mismatch"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = (event, listener, payload_len);
}

pub(crate) fn resolved(event: &str, matched: usize, skipped: usize) {
    #[cfg(feature = "tracing")]
    tracing::debug!(event, matched, skipped, "listeners resolved");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, matched, skipped);
}

pub(crate) fn listener_failed(event: &str, index: usize, error: &ListenerError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(event, index, %error, "listener failed");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, index, error);
}

pub(crate) fn undelivered(event: &str, index: usize) {
    #[cfg(feature = "tracing")]
    tracing::warn!(event, index, "background result dropped: receiver closed");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, index);
}

pub(crate) fn spawn_failed(event: &str, index: usize, error: &io::Error) {
    #[cfg(feature = "tracing")]
    tracing::error!(event, index, %error, "failed to start background listener");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, index, error);
}
