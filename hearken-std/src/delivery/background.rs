//! # Background delivery: one concurrent unit per listener
//!
//! [`BackgroundDelivery`] starts every matched listener on its own unit of
//! execution and returns immediately with a [`Background`] handle.
//!
//! ## What it guarantees
//! - `deliver` never waits for a listener.
//! - Exactly one [`Slot`] per dispatched listener, even if the listener
//!   panics, its unit fails to start, or the runtime drops the unit
//!   without running it.
//! - Producers never block: the result queue holds one slot per listener.
//!
//! ## What it does **not** guarantee
//! - No ordering across listeners.
//! - No cancellation; a started listener runs to completion.
//!
//! ## Diagram
//! ```text
//!    deliver(resolution)
//!        │                    (Arc-clone of payload per listener)
//!        ├──► unit L1 ─► call() ─┐
//!        ├──► unit L2 ─► call() ─┼──► [bounded queue, cap = N] ──► Background
//!        └──► unit LN ─► call() ─┘
//! ```

use super::traits::Delivery;
use crate::{
    config::{EmitterConfig, Executor},
    observe,
    resolve::Resolution,
};
use futures::Stream;
use hearken_core::{ListenerError, Values};
use std::{
    io,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    thread,
};
use tokio::{runtime::Handle, sync::mpsc};

/// Outcome of one background listener.
pub type Slot = Result<Values, ListenerError>;

/// A background delivery strategy.
#[derive(Debug, Clone)]
pub struct BackgroundDelivery {
    executor: Executor,
    thread_name: String,
}

impl Default for BackgroundDelivery {
    fn default() -> Self {
        Self::new(&EmitterConfig::default())
    }
}

impl BackgroundDelivery {
    /// Create a strategy from emitter settings.
    pub fn new(config: &EmitterConfig) -> Self {
        Self {
            executor: config.executor().clone(),
            thread_name: config.thread_name().to_string(),
        }
    }

    fn spawn<F>(&self, unit: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.executor {
            Executor::Runtime(handle) => {
                handle.spawn_blocking(unit);
                Ok(())
            }
            Executor::Threads => self.spawn_thread(unit),
            Executor::Auto => match Handle::try_current() {
                Ok(handle) => {
                    handle.spawn_blocking(unit);
                    Ok(())
                }
                Err(_) => self.spawn_thread(unit),
            },
        }
    }

    fn spawn_thread<F>(&self, unit: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(unit)
            .map(drop)
    }
}

/// The sending half owned by one unit.
///
/// Sends the unit's slot exactly once. If the unit is dropped without
/// running, e.g. by a runtime that has shut down, the guard reports a
/// [`ListenerError::Spawn`] slot in its place.
struct SlotSender {
    tx: Option<mpsc::Sender<Slot>>,
    event: Arc<str>,
    index: usize,
}

impl SlotSender {
    fn send(mut self, slot: Slot) {
        if let Some(tx) = self.tx.take() {
            if let Err(error) = &slot {
                observe::listener_failed(&self.event, self.index, error);
            }
            if tx.try_send(slot).is_err() {
                observe::undelivered(&self.event, self.index);
            }
        }
    }
}

impl Drop for SlotSender {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let error = ListenerError::Spawn("listener unit dropped before it ran".to_string());
            observe::listener_failed(&self.event, self.index, &error);
            // Capacity equals the dispatched count, so this slot always fits.
            let _ = tx.try_send(Err(error));
        }
    }
}

impl Delivery for BackgroundDelivery {
    type Output = Background;

    fn deliver(&self, resolution: Resolution) -> Self::Output {
        let (event, listeners, payload) = resolution.into_parts();
        let event: Arc<str> = Arc::from(event);
        let dispatched = listeners.len();
        let (tx, rx) = mpsc::channel::<Slot>(dispatched.max(1));

        for (index, listener) in listeners.into_iter().enumerate() {
            let sender = SlotSender {
                tx: Some(tx.clone()),
                event: Arc::clone(&event),
                index,
            };
            let payload = payload.clone();

            let unit = move || sender.send(listener.call(&payload));

            // A unit that fails to start is dropped, and its sender reports the slot.
            if let Err(err) = self.spawn(unit) {
                observe::spawn_failed(&event, index, &err);
            }
        }

        Background::new(rx, dispatched)
    }
}

/// Receiving end of a background firing.
///
/// Yields exactly one [`Slot`] per dispatched listener, in completion
/// order, then `None`.
///
/// # Example
///
/// ```rust
/// use hearken_std::emitter::EventEmitter;
///
/// let emitter = EventEmitter::new();
/// emitter.on("bg", |n: i32| n + 1);
/// emitter.on("bg", |n: i32| n * 10);
///
/// let background = emitter.fire_background("bg", hearken_core::payload![1]).unwrap();
/// assert_eq!(background.len(), 2);
///
/// let mut seen: Vec<i32> = background
///     .wait()
///     .into_iter()
///     .map(|slot| *slot.unwrap().get_as::<i32>(0).unwrap())
///     .collect();
/// seen.sort();
/// assert_eq!(seen, vec![2, 10]);
/// ```
#[must_use = "background results are only observable through the returned handle"]
pub struct Background {
    rx: mpsc::Receiver<Slot>,
    dispatched: usize,
    remaining: usize,
}

impl Background {
    pub(crate) fn new(rx: mpsc::Receiver<Slot>, dispatched: usize) -> Self {
        Self {
            rx,
            dispatched,
            remaining: dispatched,
        }
    }

    /// Number of dispatched listeners.
    pub fn len(&self) -> usize {
        self.dispatched
    }

    /// Returns `true` if no listener was dispatched.
    pub fn is_empty(&self) -> bool {
        self.dispatched == 0
    }

    /// Number of slots not yet received.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Receive the next completed slot.
    pub async fn recv(&mut self) -> Option<Slot> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.rx.recv().await?;
        self.remaining -= 1;
        Some(slot)
    }

    /// Receive the next completed slot, blocking the current thread.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<Slot> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.rx.blocking_recv()?;
        self.remaining -= 1;
        Some(slot)
    }

    /// Blocking iterator over the remaining slots.
    ///
    /// # Panics
    ///
    /// Panics if polled from within an asynchronous execution context.
    pub fn blocking_iter(&mut self) -> impl Iterator<Item = Slot> + '_ {
        std::iter::from_fn(move || self.blocking_recv())
    }

    /// Wait for every remaining slot.
    pub async fn collect_all(mut self) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(self.remaining);
        while let Some(slot) = self.recv().await {
            slots.push(slot);
        }
        slots
    }

    /// Wait for every remaining slot, blocking the current thread.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn wait(mut self) -> Vec<Slot> {
        self.blocking_iter().collect()
    }
}

impl Stream for Background {
    type Item = Slot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.remaining == 0 {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(slot)) => {
                self.remaining -= 1;
                Poll::Ready(Some(slot))
            }
            other => other,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Background")
            .field("dispatched", &self.dispatched)
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::Registry, resolve::resolve};
    use futures::StreamExt;
    use hearken_core::{Listener, payload};
    use std::time::{Duration, Instant};

    fn threads() -> BackgroundDelivery {
        let config = crate::config::EmitterBuilder::new()
            .executor(Executor::Threads)
            .into_config();
        BackgroundDelivery::new(&config)
    }

    #[test]
    fn test_one_slot_per_listener() {
        let registry = Registry::new();
        registry.insert("bg", Listener::new(|n: i32| n + 1));
        registry.insert("bg", Listener::new(|n: i32| n + 2));
        registry.insert("bg", Listener::new(|a: i32, b: i32| a + b));

        let resolution = resolve(&registry, "bg", payload![1]).unwrap();
        let background = threads().deliver(resolution);
        assert_eq!(background.len(), 2);

        let mut values: Vec<i32> = background
            .wait()
            .into_iter()
            .map(|slot| *slot.unwrap().get_as::<i32>(0).unwrap())
            .collect();
        values.sort();
        assert_eq!(values, vec![2, 3]);
    }

    #[test]
    fn test_panic_is_isolated_to_its_slot() {
        let registry = Registry::new();
        registry.insert("bg", Listener::new(|_: i32| -> i32 { panic!("listener down") }));
        registry.insert("bg", Listener::new(|n: i32| n));

        let resolution = resolve(&registry, "bg", payload![5]).unwrap();
        let slots = threads().deliver(resolution).wait();

        assert_eq!(slots.len(), 2);
        let failures = slots
            .iter()
            .filter(|slot| matches!(slot, Err(ListenerError::Panicked(msg)) if msg == "listener down"))
            .count();
        assert_eq!(failures, 1);
        assert!(slots.iter().any(|slot| matches!(slot, Ok(values) if values.get_as::<i32>(0) == Some(&5))));
    }

    #[test]
    fn test_deliver_returns_before_listeners_finish() {
        let registry = Registry::new();
        registry.insert(
            "slow",
            Listener::new(|| std::thread::sleep(Duration::from_millis(200))),
        );

        let start = Instant::now();
        let resolution = resolve(&registry, "slow", payload![]).unwrap();
        let mut background = threads().deliver(resolution);
        assert!(start.elapsed() < Duration::from_millis(150));

        assert!(background.blocking_recv().unwrap().unwrap().is_empty());
        assert!(background.blocking_recv().is_none());
        assert_eq!(background.remaining(), 0);
    }

    #[test]
    fn test_empty_resolution() {
        let registry = Registry::new();
        registry.insert("evt", Listener::new(|| ()));

        let resolution = resolve(&registry, "evt", payload![1, 2]).unwrap();
        let background = threads().deliver(resolution);
        assert!(background.is_empty());
        assert!(background.wait().is_empty());
    }

    #[test]
    fn test_shut_down_runtime_reports_spawn_slots() {
        let runtime = tokio::runtime::Builder::new_multi_thread().build().unwrap();
        let handle = runtime.handle().clone();
        runtime.shutdown_background();

        let registry = Registry::new();
        registry.insert("bg", Listener::new(|n: i32| n + 1));
        registry.insert("bg", Listener::new(|n: i32| n * 2));

        let config = crate::config::EmitterBuilder::new()
            .executor(Executor::Runtime(handle))
            .into_config();
        let resolution = resolve(&registry, "bg", payload![1]).unwrap();
        let background = BackgroundDelivery::new(&config).deliver(resolution);
        assert_eq!(background.len(), 2);

        let slots = background.wait();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|slot| matches!(slot, Err(ListenerError::Spawn(_)))));
    }

    #[test]
    fn test_dropped_unit_sends_spawn_slot() {
        let (tx, mut rx) = mpsc::channel::<Slot>(1);
        let sender = SlotSender {
            tx: Some(tx),
            event: Arc::from("bg"),
            index: 3,
        };
        drop(sender);

        match rx.blocking_recv() {
            Some(Err(ListenerError::Spawn(msg))) => assert!(msg.contains("dropped")),
            other => panic!("unexpected slot: {other:?}"),
        }
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn test_sent_slot_is_not_duplicated() {
        let (tx, mut rx) = mpsc::channel::<Slot>(2);
        let sender = SlotSender {
            tx: Some(tx),
            event: Arc::from("bg"),
            index: 0,
        };
        sender.send(Ok(Values::default()));

        assert!(rx.blocking_recv().unwrap().unwrap().is_empty());
        assert!(rx.blocking_recv().is_none());
    }

    #[tokio::test]
    async fn test_stream_on_runtime_blocking_pool() {
        let registry = Registry::new();
        for i in 0..4_i32 {
            registry.insert("bg", Listener::new(move |n: i32| n * i));
        }

        let resolution = resolve(&registry, "bg", payload![10]).unwrap();
        let background = BackgroundDelivery::default().deliver(resolution);

        let mut values: Vec<i32> = background
            .map(|slot| *slot.unwrap().get_as::<i32>(0).unwrap())
            .collect()
            .await;
        values.sort();
        assert_eq!(values, vec![0, 10, 20, 30]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_explicit_runtime_handle() {
        let registry = Registry::new();
        registry.insert("bg", Listener::new(|s: String| s.len()));

        let config = crate::config::EmitterBuilder::new()
            .executor(Executor::Runtime(Handle::current()))
            .into_config();
        let resolution = resolve(&registry, "bg", payload![String::from("four")]).unwrap();
        let slots = BackgroundDelivery::new(&config)
            .deliver(resolution)
            .collect_all()
            .await;

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].as_ref().unwrap().get_as::<usize>(0), Some(&4));
    }
}
