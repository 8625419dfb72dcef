//! Emitter configuration.
//!
//! Configuration is programmatic; build it with [`EmitterBuilder`] or use
//! [`EmitterConfig::default`].
//!
//! ```rust
//! use hearken_std::{config::Executor, emitter::EventEmitter};
//!
//! let emitter = EventEmitter::builder()
//!     .executor(Executor::Threads)
//!     .thread_name("audit-listener")
//!     .build();
//! assert_eq!(emitter.config().thread_name(), "audit-listener");
//! ```

use crate::emitter::EventEmitter;
use tokio::runtime::Handle;

/// Default name for OS threads running background listeners.
pub const DEFAULT_THREAD_NAME: &str = "hearken-listener";

/// Where background listeners run.
#[derive(Debug, Clone, Default)]
pub enum Executor {
    /// The ambient tokio runtime's blocking pool when called from inside a
    /// runtime, a dedicated OS thread otherwise.
    #[default]
    Auto,
    /// Always a dedicated OS thread per listener.
    Threads,
    /// Always the blocking pool of the given runtime.
    Runtime(Handle),
}

/// Resolved emitter settings.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    executor: Executor,
    thread_name: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            executor: Executor::Auto,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl EmitterConfig {
    /// Background executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Name given to OS threads spawned for background listeners.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

/// Builder for an [`EventEmitter`].
#[derive(Debug, Clone, Default)]
pub struct EmitterBuilder {
    config: EmitterConfig,
}

impl EmitterBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background executor.
    pub fn executor(mut self, executor: Executor) -> Self {
        self.config.executor = executor;
        self
    }

    /// Set the name of OS threads spawned for background listeners.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Finish configuration without building an emitter.
    pub fn into_config(self) -> EmitterConfig {
        self.config
    }

    /// Build the emitter.
    pub fn build(self) -> EventEmitter {
        EventEmitter::with_config(self.config)
    }
}
