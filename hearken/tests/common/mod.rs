#![allow(dead_code)]

use hearken::{EventEmitter, Executor, Values};

// ============================================================================
// Fixtures
// ============================================================================

/// An emitter whose background listeners always run on OS threads, so sync
/// tests can block on results.
pub fn threaded_emitter() -> EventEmitter {
    EventEmitter::builder()
        .executor(Executor::Threads)
        .thread_name("hearken-test")
        .build()
}

/// Emitter with `f(a, b) = a + b` then `g(a, b) = a * b` under `"event"`.
pub fn arithmetic_emitter() -> EventEmitter {
    let emitter = EventEmitter::new();
    emitter.on("event", |a: i32, b: i32| a + b);
    emitter.on("event", |a: i32, b: i32| a * b);
    emitter
}

// ============================================================================
// Helpers
// ============================================================================

/// First result of every listener, as `i32`.
pub fn first_i32(results: &[Values]) -> Vec<i32> {
    results
        .iter()
        .map(|values| *values.get_as::<i32>(0).expect("listener returned an i32"))
        .collect()
}
