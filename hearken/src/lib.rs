//! # hearken - In-Process Event Emitter
//!
//! `hearken` decouples the code that announces an occurrence from the code
//! that reacts to it. Listeners are registered under an event name and
//! fired with a payload; each listener's return values are collected.
//!
//! Listeners are late-bound: listeners of different signatures may share an
//! event name, and a firing only calls those whose parameter count matches
//! the payload. Argument types are checked when a listener is called.
//!
//! ## Quick Start
//!
//! ```rust
//! use hearken::{EventEmitter, payload};
//!
//! let emitter = EventEmitter::new();
//! emitter.on("mixed", |a: i32| a);
//! emitter.on("mixed", |a: i32, b: i32| a * b);
//!
//! // Only the two-parameter listener matches.
//! let results = emitter.fire("mixed", payload![5, 6]).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].get_as::<i32>(0), Some(&30));
//! ```
//!
//! ## Background Firing
//!
//! ```rust
//! use hearken::{EventEmitter, payload};
//!
//! let emitter = EventEmitter::new();
//! emitter.on("bg", |n: u64| n + 1);
//! emitter.on("bg", |n: u64| n + 2);
//!
//! let background = emitter.fire_background("bg", payload![1_u64]).unwrap();
//! let slots = background.wait();
//! assert_eq!(slots.len(), 2);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use hearken_core::{
    // Values
    Payload,
    Value,
    Values,
    payload,
    // Listeners
    Arity,
    IntoListener,
    Listener,
    // Error types
    BoxError,
    EmitterError,
    ListenerError,
};

pub use hearken_std::{
    config::{DEFAULT_THREAD_NAME, EmitterBuilder, EmitterConfig, Executor},
    delivery::{Background, Slot},
    emitter::EventEmitter,
    registry::Registry,
    resolve::{Resolution, resolve},
};

/// Delivery strategies for event processing.
pub mod delivery {
    pub use hearken_std::delivery::{
        Background, BackgroundDelivery, Delivery, SequentialDelivery, Slot,
    };
}

/// Testing utilities.
pub mod testing {
    pub use hearken_std::testing::{CountingListener, RecordingListener, SpyListener};
}

/// Prelude module - common imports for Hearken.
///
/// # Usage
///
/// ```rust
/// use hearken::prelude::*;
///
/// let emitter = EventEmitter::new();
/// emitter.on("ping", || "pong");
/// assert!(emitter.has("ping"));
/// ```
pub mod prelude {
    pub use crate::{
        Background, EmitterError, EventEmitter, Listener, ListenerError, Payload, Value, Values,
        payload,
    };
}
