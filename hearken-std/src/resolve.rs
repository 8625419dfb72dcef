//! Resolution: listener lookup and arity filtering.

use crate::{observe, registry::Registry};
use hearken_core::{EmitterError, Listener, Payload};

/// The listeners selected for one firing, with the payload they share.
#[derive(Debug, Clone)]
pub struct Resolution {
    event: String,
    listeners: Vec<Listener>,
    payload: Payload,
    skipped: usize,
}

impl Resolution {
    /// The fired event name.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Matched listeners, in registration order.
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// The payload shared by every matched listener.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Number of registered listeners skipped for arity mismatch.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of matched listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener matched.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Split into event name, matched listeners and payload.
    pub fn into_parts(self) -> (String, Vec<Listener>, Payload) {
        (self.event, self.listeners, self.payload)
    }
}

/// Look up the listeners for `event` and keep those whose arity accepts
/// `payload`.
///
/// Fails with [`EmitterError::UnknownEvent`] if the name has no entry.
/// Mismatched listeners are skipped, not reported as errors. The registry
/// lock is held only while the listener list is copied.
pub fn resolve(
    registry: &Registry,
    event: &str,
    payload: Payload,
) -> Result<Resolution, EmitterError> {
    let registered = registry
        .snapshot(event)
        .ok_or_else(|| EmitterError::UnknownEvent(event.to_string()))?;
    let total = registered.len();

    let listeners: Vec<Listener> = registered
        .into_iter()
        .filter(|listener| {
            let accepted = listener.accepts(&payload);
            if !accepted {
                observe::skipped(event, listener, payload.len());
            }
            accepted
        })
        .collect();

    let skipped = total - listeners.len();
    observe::resolved(event, listeners.len(), skipped);

    Ok(Resolution {
        event: event.to_string(),
        listeners,
        payload,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearken_core::{Arity, Payload, payload};

    #[test]
    fn test_unknown_event() {
        let registry = Registry::new();
        let err = resolve(&registry, "missing", Payload::default()).unwrap_err();
        assert!(matches!(err, EmitterError::UnknownEvent(name) if name == "missing"));
    }

    #[test]
    fn test_arity_filter_keeps_order() {
        let registry = Registry::new();
        registry.insert("mixed", Listener::new(|a: i32| a));
        registry.insert("mixed", Listener::new(|a: i32, b: i32| a + b));
        registry.insert("mixed", Listener::variadic(|p: &Payload| p.len()));
        registry.insert("mixed", Listener::new(|a: i32, b: i32| a * b));

        let resolution = resolve(&registry, "mixed", payload![5, 6]).unwrap();
        assert_eq!(resolution.len(), 3);
        assert_eq!(resolution.skipped(), 1);
        let arities: Vec<Arity> = resolution.listeners().iter().map(Listener::arity).collect();
        assert_eq!(
            arities,
            vec![Arity::Exact(2), Arity::Variadic, Arity::Exact(2)]
        );
    }

    #[test]
    fn test_all_skipped_is_empty_not_error() {
        let registry = Registry::new();
        registry.insert("evt", Listener::new(|| ()));

        let resolution = resolve(&registry, "evt", payload![1]).unwrap();
        assert!(resolution.is_empty());
        assert_eq!(resolution.skipped(), 1);
        assert_eq!(resolution.event(), "evt");
        assert_eq!(resolution.payload().len(), 1);
    }
}
