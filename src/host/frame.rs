//! Embedded content frame element.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::Result;
use crate::identifiers::{ContextId, FrameId};

use super::ContentWindow;
use super::node::validate_attribute_name;

// ============================================================================
// Types
// ============================================================================

/// Native load completion handler.
///
/// A frame holds at most one; setting a new handler replaces the old one.
pub type LoadHandler = Arc<dyn Fn(&Frame) + Send + Sync>;

/// Whether a frame is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Not displayed (pre-loading off-screen).
    #[default]
    Hidden,
    /// Displayed.
    Visible,
}

/// Internal shared state for a frame.
pub(crate) struct FrameInner {
    id: FrameId,
    attributes: Mutex<BTreeMap<String, String>>,
    visibility: Mutex<Visibility>,
    attached: AtomicBool,
    content: ContentWindow,
    onload: Mutex<Option<LoadHandler>>,
}

// ============================================================================
// Frame
// ============================================================================

/// A handle to an embedded content frame.
///
/// Clones share the same element. Frames start hidden and detached.
#[derive(Clone)]
pub struct Frame {
    pub(crate) inner: Arc<FrameInner>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.inner.id)
            .field("attached", &self.is_attached())
            .field("visibility", &self.visibility())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Frame {}

impl Hash for Frame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Creates a detached, hidden frame with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FrameInner {
                id: FrameId::generate(),
                attributes: Mutex::new(BTreeMap::new()),
                visibility: Mutex::new(Visibility::Hidden),
                attached: AtomicBool::new(false),
                content: ContentWindow::new(),
                onload: Mutex::new(None),
            }),
        }
    }

    /// Creates a frame with the given attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttribute`](crate::Error::InvalidAttribute)
    /// for the first invalid name; no frame is created in that case.
    pub fn with_attributes<I, K, V>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, value) in attributes {
            let name = name.into();
            validate_attribute_name(&name)?;
            map.insert(name, value.into());
        }

        let frame = Self::new();
        *frame.inner.attributes.lock() = map;
        Ok(frame)
    }
}

// ============================================================================
// Frame - Accessors
// ============================================================================

impl Frame {
    /// Returns the frame ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> FrameId {
        self.inner.id
    }

    /// Returns the content context identity.
    ///
    /// Stable for the frame's lifetime, even while detached.
    #[inline]
    #[must_use]
    pub fn context_id(&self) -> ContextId {
        self.inner.content.context_id()
    }

    /// Returns the content context while the frame is attached.
    #[inline]
    #[must_use]
    pub fn content_window(&self) -> Option<ContentWindow> {
        self.is_attached().then(|| self.inner.content.clone())
    }

    /// Returns `true` while the frame is a child of a container.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.attached.load(Ordering::Acquire)
    }

    pub(crate) fn set_attached(&self, attached: bool) {
        self.inner.attached.store(attached, Ordering::Release);
    }
}

// ============================================================================
// Frame - Attributes
// ============================================================================

impl Frame {
    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.lock().get(name).cloned()
    }

    /// Returns `true` if the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.lock().contains_key(name)
    }

    /// Returns a snapshot of all attributes.
    #[must_use]
    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.inner.attributes.lock().clone()
    }

    /// Sets an attribute, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttribute`](crate::Error::InvalidAttribute)
    /// if `name` is not a valid attribute name.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_attribute_name(&name)?;
        self.inner.attributes.lock().insert(name, value.into());
        Ok(())
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.lock().remove(name)
    }
}

// ============================================================================
// Frame - Visibility
// ============================================================================

impl Frame {
    /// Returns the current visibility.
    #[inline]
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        *self.inner.visibility.lock()
    }

    /// Returns `true` if the frame is displayed.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility() == Visibility::Visible
    }

    /// Sets the visibility.
    pub fn set_visibility(&self, visibility: Visibility) {
        *self.inner.visibility.lock() = visibility;
    }
}

// ============================================================================
// Frame - Load Completion
// ============================================================================

impl Frame {
    /// Installs the native load handler, replacing any previous one.
    pub fn set_onload<F>(&self, handler: F)
    where
        F: Fn(&Frame) + Send + Sync + 'static,
    {
        *self.inner.onload.lock() = Some(Arc::new(handler));
    }

    /// Removes the native load handler.
    pub fn clear_onload(&self) {
        self.inner.onload.lock().take();
    }

    /// Returns `true` if a load handler is installed.
    #[must_use]
    pub fn has_onload(&self) -> bool {
        self.inner.onload.lock().is_some()
    }

    /// Signals that the frame's content finished loading.
    ///
    /// Called by the embedding when the content document completes. A
    /// detached frame never loads, so this is a no-op then. Returns `true`
    /// if a handler ran.
    pub fn complete_load(&self) -> bool {
        if !self.is_attached() {
            trace!(frame_id = %self.inner.id, "Load completion on detached frame ignored");
            return false;
        }

        let handler = self.inner.onload.lock().clone();
        match handler {
            Some(handler) => {
                debug!(frame_id = %self.inner.id, "Frame load completed");
                handler(self);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;

    use crate::error::Error;

    #[test]
    fn test_new_frame_is_hidden_and_detached() {
        let frame = Frame::new();
        assert_eq!(frame.visibility(), Visibility::Hidden);
        assert!(!frame.is_attached());
        assert!(frame.content_window().is_none());
        assert!(frame.attributes().is_empty());
    }

    #[test]
    fn test_with_attributes() {
        let frame = Frame::with_attributes([("src", "/a"), ("title", "Preview")])
            .expect("valid attributes");

        assert_eq!(frame.attribute("src").as_deref(), Some("/a"));
        assert_eq!(frame.attribute("title").as_deref(), Some("Preview"));
        assert_eq!(frame.attributes().len(), 2);
    }

    #[test]
    fn test_with_attributes_rejects_invalid_name() {
        let err = Frame::with_attributes([("src", "/a"), ("bad name", "x")]).unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { .. }));
    }

    #[test]
    fn test_set_and_remove_attribute() {
        let frame = Frame::new();
        frame.set_attribute("srcdoc", "<p>hi</p>").expect("valid");
        assert!(frame.has_attribute("srcdoc"));

        assert_eq!(frame.remove_attribute("srcdoc").as_deref(), Some("<p>hi</p>"));
        assert!(!frame.has_attribute("srcdoc"));
    }

    #[test]
    fn test_content_window_requires_attachment() {
        let frame = Frame::new();
        frame.set_attached(true);

        let content = frame.content_window().expect("attached frame has content");
        assert_eq!(content.context_id(), frame.context_id());
    }

    #[test]
    fn test_complete_load_runs_handler() {
        let frame = Frame::new();
        frame.set_attached(true);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        frame.set_onload(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(frame.complete_load());
        assert!(frame.complete_load());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_complete_load_detached_is_noop() {
        let frame = Frame::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        frame.set_onload(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!frame.complete_load());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_onload_replaces() {
        let frame = Frame::new();
        frame.set_attached(true);

        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        frame.set_onload(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        frame.set_onload(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        frame.complete_load();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        frame.clear_onload();
        assert!(!frame.has_onload());
        assert!(!frame.complete_load());
    }

    #[test]
    fn test_frame_equality_is_identity() {
        let a = Frame::new();
        let b = Frame::new();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
