//! # hearken-core
//!
//! Core types for the Hearken in-process event emitter.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that only builds listeners or inspects results, without pulling in
//! the registry and delivery machinery of `hearken-std`.
//!
//! # Late-Bound Listeners
//!
//! Hearken registers heterogeneous callables under a single event name and
//! decides at fire time which of them can take the payload:
//!
//! - [`Value`] / [`Payload`] / [`Values`]: type-erased arguments and results
//! - [`Listener`]: a callable plus its [`Arity`] and invocation adapter
//! - [`IntoListener`]: conversion from plain closures and functions
//!
//! # Error Types
//!
//! - [`EmitterError`] - Top-level error type
//! - [`ListenerError`] - Failure of a single listener invocation

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod listener;
mod value;

// Re-exports
pub use error::{BoxError, EmitterError, ListenerError};
pub use listener::{Arity, IntoListener, Listener};
pub use value::{Payload, Value, Values};
