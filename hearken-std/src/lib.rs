//! # hearken-std
//!
//! Standard implementations for the Hearken in-process event emitter.
//!
//! This crate provides:
//! - **Registry**: [`Registry`](registry::Registry), the guarded event-name → listeners map
//! - **Resolution**: [`resolve`](resolve::resolve), lookup plus arity filtering
//! - **Delivery**: [`SequentialDelivery`](delivery::SequentialDelivery) and
//!   [`BackgroundDelivery`](delivery::BackgroundDelivery)
//! - **Emitter**: [`EventEmitter`](emitter::EventEmitter) and its
//!   [configuration](config)
//! - **Testing**: recording and counting listeners
//!
//! # Feature Flags
//!
//! - `tracing` (default): structured log events for registration,
//!   resolution and listener failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use hearken_core;

// Modules
pub mod config;
pub mod delivery;
pub mod emitter;
mod observe;
pub mod registry;
pub mod resolve;
pub mod testing;
