//! Frame content context.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use crate::identifiers::ContextId;
use crate::protocol::Message;

use super::HostWindow;

// ============================================================================
// Types
// ============================================================================

/// Scroll offset of a content context, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScrollPosition {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

/// Internal shared state for a content context.
struct ContentInner {
    context_id: ContextId,
    scroll: Mutex<ScrollPosition>,
}

// ============================================================================
// ContentWindow
// ============================================================================

/// The content context hosted inside a frame.
///
/// The document itself is opaque; only its identity and scroll position
/// matter to the swapper.
#[derive(Clone)]
pub struct ContentWindow {
    inner: Arc<ContentInner>,
}

impl fmt::Debug for ContentWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentWindow")
            .field("context_id", &self.inner.context_id)
            .field("scroll", &*self.inner.scroll.lock())
            .finish()
    }
}

impl Default for ContentWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentWindow {
    /// Creates a content context scrolled to the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContentInner {
                context_id: ContextId::generate(),
                scroll: Mutex::new(ScrollPosition::default()),
            }),
        }
    }

    /// Returns the context identity.
    #[inline]
    #[must_use]
    pub fn context_id(&self) -> ContextId {
        self.inner.context_id
    }
}

// ============================================================================
// ContentWindow - Scroll
// ============================================================================

impl ContentWindow {
    /// Returns the current scroll position.
    #[inline]
    #[must_use]
    pub fn scroll_position(&self) -> ScrollPosition {
        *self.inner.scroll.lock()
    }

    /// Returns the horizontal scroll offset.
    #[inline]
    #[must_use]
    pub fn scroll_x(&self) -> i32 {
        self.inner.scroll.lock().x
    }

    /// Returns the vertical scroll offset.
    #[inline]
    #[must_use]
    pub fn scroll_y(&self) -> i32 {
        self.inner.scroll.lock().y
    }

    /// Scrolls to the given position. Negative offsets clamp to zero.
    pub fn scroll_to(&self, x: i32, y: i32) {
        let position = ScrollPosition {
            x: x.max(0),
            y: y.max(0),
        };
        *self.inner.scroll.lock() = position;
        trace!(context = %self.inner.context_id, x = position.x, y = position.y, "Scrolled to");
    }

    /// Scrolls by the given amount.
    pub fn scroll_by(&self, dx: i32, dy: i32) {
        let current = self.scroll_position();
        self.scroll_to(current.x.saturating_add(dx), current.y.saturating_add(dy));
    }
}

// ============================================================================
// ContentWindow - Messaging
// ============================================================================

impl ContentWindow {
    /// Posts `data` to the host window with this context as the source.
    ///
    /// Returns the number of listeners that received it.
    pub fn post_to_parent(&self, window: &HostWindow, data: Value) -> usize {
        window.post_message(&Message::from_context(self.context_id(), data))
    }
}

// ============================================================================
// Tests
// ============================================================================
