//! Event listener registry.
//!
//! Listeners are either callbacks or channel senders. Callbacks stay until
//! removed; channel listeners are dropped once their receiver is gone.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tracing::trace;

use crate::host::Frame;
use crate::identifiers::SubscriptionId;
use crate::protocol::{EventKind, SwapperEvent};

use super::core::{FrameSwapper, SwapperInner};

// ============================================================================
// Types
// ============================================================================

/// Event listener callback.
pub type EventCallback = Arc<dyn Fn(&SwapperEvent) + Send + Sync>;

/// Where an event is delivered.
#[derive(Clone)]
enum Sink {
    Callback(EventCallback),
    Channel(mpsc::UnboundedSender<SwapperEvent>),
}

/// A registered listener with its optional kind filter.
#[derive(Clone)]
struct Listener {
    kind: Option<EventKind>,
    sink: Sink,
}

// ============================================================================
// EventListeners
// ============================================================================

/// Listener map keyed by subscription.
#[derive(Default)]
pub(crate) struct EventListeners {
    listeners: Mutex<FxHashMap<SubscriptionId, Listener>>,
}

impl EventListeners {
    fn insert(&self, kind: Option<EventKind>, sink: Sink) -> SubscriptionId {
        let id = SubscriptionId::generate();
        self.listeners.lock().insert(id, Listener { kind, sink });
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Delivers `event` to matching listeners, outside the lock.
    pub fn dispatch(&self, event: &SwapperEvent) {
        let targets: Vec<(SubscriptionId, Sink)> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, listener)| listener.kind.is_none_or(|kind| kind == event.kind()))
            .map(|(id, listener)| (*id, listener.sink.clone()))
            .collect();

        let mut closed = Vec::new();
        for (id, sink) in targets {
            match sink {
                Sink::Callback(callback) => callback(event),
                Sink::Channel(tx) => {
                    if tx.send(event.clone()).is_err() {
                        closed.push(id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            let mut listeners = self.listeners.lock();
            for id in &closed {
                listeners.remove(id);
            }
            trace!(count = closed.len(), "Dropped closed event channels");
        }
    }
}

// ============================================================================
// SwapperInner - Emission
// ============================================================================

impl SwapperInner {
    /// Dispatches an event for `frame` to all listeners.
    pub(crate) fn emit(&self, kind: EventKind, frame: &Frame) {
        trace!(event = %kind, frame_id = %frame.id(), "Emitting event");
        self.listeners
            .dispatch(&SwapperEvent::new(kind, frame.clone()));
    }
}

// ============================================================================
// FrameSwapper - Listeners
// ============================================================================

impl FrameSwapper {
    /// Registers a callback for one kind of event.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use frame_swapper::{EventKind, FrameSwapper};
    ///
    /// # fn example(swapper: &FrameSwapper) {
    /// swapper.add_event_listener(EventKind::Swapped, |event| {
    ///     println!("removed frame {}", event.frame().id());
    /// });
    /// # }
    /// ```
    pub fn add_event_listener<F>(&self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: Fn(&SwapperEvent) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .insert(Some(kind), Sink::Callback(Arc::new(callback)))
    }

    /// Registers a callback for every event.
    pub fn add_any_event_listener<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SwapperEvent) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .insert(None, Sink::Callback(Arc::new(callback)))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_event_listener(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn event_listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Returns a stream of every event, in emission order.
    ///
    /// The subscription ends when the receiver is dropped.
    #[must_use]
    pub fn events(&self) -> mpsc::UnboundedReceiver<SwapperEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.listeners.insert(None, Sink::Channel(tx));
        rx
    }
}

// ============================================================================
// Tests
// ============================================================================
