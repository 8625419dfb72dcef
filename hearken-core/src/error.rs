//! Error types for Hearken.
//!
//! - [`EmitterError`] - Top-level error returned by emitter operations
//! - [`ListenerError`] - Failure of a single listener invocation

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all emitter operations.
#[derive(Error, Debug)]
pub enum EmitterError {
    /// A late-bound value offered for registration does not hold a listener.
    #[error("listener is not callable: got a value of type `{0}`")]
    NotCallable(&'static str),

    /// The event name has no registrations.
    #[error("event not defined: `{0}`")]
    UnknownEvent(String),

    /// A listener failed while the event was being fired synchronously.
    ///
    /// `index` is the listener's position among the listeners that matched
    /// the payload. Results of the listeners that ran before it are dropped.
    #[error("listener #{index} for event `{event}` failed: {source}")]
    Invocation {
        /// The fired event.
        event: String,
        /// Position of the failing listener among the matched listeners.
        index: usize,
        /// The underlying listener failure.
        #[source]
        source: ListenerError,
    },
}

impl EmitterError {
    /// Returns `true` if this error reports an unregistered event name.
    pub fn is_unknown_event(&self) -> bool {
        matches!(self, EmitterError::UnknownEvent(_))
    }
}

/// Errors raised by a single listener invocation.
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The payload length differs from the listener's parameter count.
    #[error("listener expects {expected} argument(s), received {found}")]
    ArgumentCount {
        /// Declared parameter count.
        expected: usize,
        /// Payload length.
        found: usize,
    },

    /// A payload value could not be converted into the parameter type.
    #[error("argument {position} has type `{found}`, expected `{expected}`")]
    ArgumentType {
        /// Zero-based parameter position.
        position: usize,
        /// Parameter type declared by the listener.
        expected: &'static str,
        /// Type of the value found in the payload.
        found: &'static str,
    },

    /// The listener panicked.
    #[error("listener panicked: {0}")]
    Panicked(String),

    /// The background unit for the listener could not be started.
    #[error("failed to start background listener: {0}")]
    Spawn(String),

    /// A custom error returned by a fallible listener.
    #[error(transparent)]
    Custom(BoxError),
}

impl From<BoxError> for ListenerError {
    fn from(err: BoxError) -> Self {
        ListenerError::Custom(err)
    }
}
