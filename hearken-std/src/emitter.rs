//! The event emitter.

use crate::{
    config::{EmitterBuilder, EmitterConfig},
    delivery::{Background, BackgroundDelivery, Delivery, SequentialDelivery},
    registry::Registry,
    resolve::resolve,
};
use hearken_core::{EmitterError, IntoListener, Listener, Payload, Value, Values};

/// An in-process publish/subscribe dispatcher.
///
/// Listeners of any supported signature are registered under an event name
/// with [`on`](Self::on). Firing an event calls every listener whose arity
/// matches the payload; the others are skipped.
///
/// Every emitter owns its own registry. Share one across threads with an
/// `Arc`; all methods take `&self`.
///
/// # Example
///
/// ```rust
/// use hearken_core::payload;
/// use hearken_std::emitter::EventEmitter;
///
/// let emitter = EventEmitter::new();
/// emitter.on("event", |a: i32, b: i32| a + b);
/// emitter.on("event", |a: i32, b: i32| a * b);
///
/// let results = emitter.fire("event", payload![3, 4]).unwrap();
/// assert_eq!(results[0].get_as::<i32>(0), Some(&7));
/// assert_eq!(results[1].get_as::<i32>(0), Some(&12));
/// ```
pub struct EventEmitter {
    registry: Registry,
    config: EmitterConfig,
    sequential: SequentialDelivery,
    background: BackgroundDelivery,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter {
    /// Create an empty emitter with default settings.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Start configuring an emitter.
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::new()
    }

    /// Create an empty emitter with the given settings.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Registry::new(),
            background: BackgroundDelivery::new(&config),
            sequential: SequentialDelivery,
            config,
        }
    }

    /// The emitter's settings.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Register a listener under `event`, after any already registered.
    pub fn on<F, Args>(&self, event: impl Into<String>, listener: F)
    where
        F: IntoListener<Args>,
    {
        self.registry.insert(event, listener.into_listener());
    }

    /// Register a late-bound value under `event`.
    ///
    /// The value must hold a [`Listener`]; anything else is rejected with
    /// [`EmitterError::NotCallable`] and the registry is left untouched.
    pub fn on_value(&self, event: impl Into<String>, value: Value) -> Result<(), EmitterError> {
        let listener = value
            .extract::<Listener>()
            .ok_or(EmitterError::NotCallable(value.type_name()))?;
        self.registry.insert(event, listener);
        Ok(())
    }

    /// Call every matching listener on this thread, in registration order.
    ///
    /// Returns one [`Values`] per matching listener. Fails with
    /// [`EmitterError::UnknownEvent`] if `event` has no registrations, and
    /// with [`EmitterError::Invocation`] on the first listener failure.
    pub fn fire(
        &self,
        event: &str,
        payload: impl Into<Payload>,
    ) -> Result<Vec<Values>, EmitterError> {
        let resolution = resolve(&self.registry, event, payload.into())?;
        self.sequential.deliver(resolution)
    }

    /// Start every matching listener concurrently and return immediately.
    ///
    /// Results arrive through the returned [`Background`] in completion
    /// order. A failing listener reports its error in its own slot.
    ///
    /// Inside async code, drain the handle with [`Background::recv`],
    /// [`Background::collect_all`] or its `Stream` impl. The blocking
    /// methods ([`Background::wait`], [`Background::blocking_recv`],
    /// [`Background::blocking_iter`]) panic in an async context.
    pub fn fire_background(
        &self,
        event: &str,
        payload: impl Into<Payload>,
    ) -> Result<Background, EmitterError> {
        let resolution = resolve(&self.registry, event, payload.into())?;
        Ok(self.background.deliver(resolution))
    }

    /// Remove every listener registered under `event`.
    pub fn clear(&self, event: &str) -> Result<(), EmitterError> {
        self.registry.remove(event).map(drop)
    }

    /// Remove every listener of every event.
    pub fn clear_events(&self) {
        self.registry.clear();
    }

    /// Returns `true` if `event` has at least one registration.
    pub fn has(&self, event: &str) -> bool {
        self.registry.contains(event)
    }

    /// Number of listeners registered under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.listener_count(event)
    }

    /// Registered event names, sorted.
    pub fn event_names(&self) -> Vec<String> {
        self.registry.event_names()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
