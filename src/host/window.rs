//! Host window message bus.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::identifiers::SubscriptionId;
use crate::protocol::Message;

// ============================================================================
// Types
// ============================================================================

/// Message listener callback.
pub type MessageHandler = Arc<dyn Fn(&Message) + Send + Sync>;

/// Map of subscription IDs to listeners.
type ListenerMap = FxHashMap<SubscriptionId, MessageHandler>;

/// Internal shared state for a host window.
struct WindowInner {
    listeners: Mutex<ListenerMap>,
}

// ============================================================================
// HostWindow
// ============================================================================

/// The top-level window that frame content posts messages to.
///
/// Every listener sees every message; filtering by source or payload is
/// the listener's job.
#[derive(Clone)]
pub struct HostWindow {
    inner: Arc<WindowInner>,
}

impl fmt::Debug for HostWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostWindow")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Default for HostWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl HostWindow {
    /// Creates a window with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(WindowInner {
                listeners: Mutex::new(ListenerMap::default()),
            }),
        }
    }

    /// Registers a message listener.
    pub fn add_message_listener<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        let id = SubscriptionId::generate();
        self.inner.listeners.lock().insert(id, Arc::new(handler));
        trace!(subscription = %id, "Message listener added");
        id
    }

    /// Removes a message listener. Returns `false` if it was not registered.
    pub fn remove_message_listener(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.listeners.lock().remove(&id).is_some();
        if removed {
            trace!(subscription = %id, "Message listener removed");
        }
        removed
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Delivers a message to every listener registered at call time.
    ///
    /// Listeners run outside the lock and may add or remove listeners.
    /// Returns the number of listeners invoked.
    pub fn post_message(&self, message: &Message) -> usize {
        let listeners: Vec<MessageHandler> =
            self.inner.listeners.lock().values().cloned().collect();

        trace!(
            source = ?message.source,
            message_type = ?message.message_type(),
            listeners = listeners.len(),
            "Posting message"
        );

        for listener in &listeners {
            listener(message);
        }
        listeners.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
