//! Container element and child-insertion notification.
//!
//! A [`Container`] keeps an ordered sequence of child nodes. Observers
//! registered with [`Container::observe`] receive a batch of
//! [`MutationRecord`]s after every structural change to the direct
//! children. Descendants of children are not tracked.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::ObserverId;

use super::node::validate_attribute_name;
use super::{Frame, Node};

// ============================================================================
// Types
// ============================================================================

/// Insertion observer callback.
///
/// Receives every record produced by one structural change.
pub type MutationCallback = Arc<dyn Fn(&[MutationRecord]) + Send + Sync>;

/// Map of observer IDs to callbacks.
type ObserverMap = FxHashMap<ObserverId, MutationCallback>;

// ============================================================================
// MutationRecord
// ============================================================================

/// One structural change to a container's children.
#[derive(Debug, Clone, Default)]
pub struct MutationRecord {
    added_nodes: Vec<Node>,
    removed_nodes: Vec<Node>,
}

impl MutationRecord {
    /// Returns nodes inserted by this change.
    #[inline]
    #[must_use]
    pub fn added_nodes(&self) -> &[Node] {
        &self.added_nodes
    }

    /// Returns nodes removed by this change.
    #[inline]
    #[must_use]
    pub fn removed_nodes(&self) -> &[Node] {
        &self.removed_nodes
    }

    /// Iterates over inserted frames.
    pub fn added_frames(&self) -> impl Iterator<Item = &Frame> {
        self.added_nodes.iter().filter_map(Node::as_frame)
    }

    /// Iterates over removed frames.
    pub fn removed_frames(&self) -> impl Iterator<Item = &Frame> {
        self.removed_nodes.iter().filter_map(Node::as_frame)
    }
}

// ============================================================================
// Container
// ============================================================================

/// Internal shared state for a container.
pub(crate) struct ContainerInner {
    attributes: Mutex<BTreeMap<String, String>>,
    children: Mutex<Vec<Node>>,
    observers: Mutex<ObserverMap>,
}

/// The element hosting a sequence of frames.
///
/// Clones share the same element.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("children", &self.child_count())
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                attributes: Mutex::new(BTreeMap::new()),
                children: Mutex::new(Vec::new()),
                observers: Mutex::new(ObserverMap::default()),
            }),
        }
    }

    /// Sets an attribute and returns the container, for markup-style setup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttribute`] if `name` is not a valid attribute name.
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.set_attribute(name, value)?;
        Ok(self)
    }
}

// ============================================================================
// Container - Attributes
// ============================================================================

impl Container {
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

    /// Sets an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttribute`] if `name` is not a valid attribute name.
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
// Container - Observation
// ============================================================================

impl Container {
    /// Registers an insertion observer.
    ///
    /// The observer stays active until [`Container::disconnect`] is called.
    pub fn observe<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&[MutationRecord]) + Send + Sync + 'static,
    {
        let id = ObserverId::generate();
        self.inner.observers.lock().insert(id, Arc::new(callback));
        debug!(observer = %id, "Observer registered");
        id
    }

    /// Releases an observer. Returns `false` if it was not registered.
    pub fn disconnect(&self, id: ObserverId) -> bool {
        let removed = self.inner.observers.lock().remove(&id).is_some();
        if removed {
            debug!(observer = %id, "Observer disconnected");
        }
        removed
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    /// Delivers a batch to every observer.
    ///
    /// Callbacks run outside the locks so they may mutate the container.
    fn notify(&self, batch: &[MutationRecord]) {
        if batch.is_empty() {
            return;
        }

        let observers: Vec<MutationCallback> =
            self.inner.observers.lock().values().cloned().collect();

        trace!(records = batch.len(), observers = observers.len(), "Delivering mutations");

        for observer in observers {
            observer(batch);
        }
    }
}

// ============================================================================
// Container - Children
// ============================================================================

impl Container {
    /// Appends a child and notifies observers with a one-record batch.
    ///
    /// Appending a frame that is already a child moves it to the end.
    pub fn append_child(&self, node: impl Into<Node>) {
        let record = {
            let mut children = self.inner.children.lock();
            insert_last(&mut children, node.into())
        };
        self.notify(&[record]);
    }

    /// Appends several children and notifies observers with one batch.
    pub fn append_children<I, N>(&self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        let batch: Vec<MutationRecord> = {
            let mut children = self.inner.children.lock();
            nodes
                .into_iter()
                .map(|node| insert_last(&mut children, node.into()))
                .collect()
        };
        self.notify(&batch);
    }

    /// Removes a frame from the children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameNotFound`] if the frame is not a child.
    pub fn remove_frame(&self, frame: &Frame) -> Result<()> {
        let node = {
            let mut children = self.inner.children.lock();
            let index = children
                .iter()
                .position(|node| node.as_frame() == Some(frame))
                .ok_or_else(|| Error::frame_not_found(frame.id()))?;
            children.remove(index)
        };

        frame.set_attached(false);
        debug!(frame_id = %frame.id(), "Frame removed");

        self.notify(&[MutationRecord {
            added_nodes: Vec::new(),
            removed_nodes: vec![node],
        }]);
        Ok(())
    }

    /// Removes the child at `index`.
    pub fn remove_child_at(&self, index: usize) -> Option<Node> {
        let node = {
            let mut children = self.inner.children.lock();
            (index < children.len()).then(|| children.remove(index))?
        };

        if let Some(frame) = node.as_frame() {
            frame.set_attached(false);
        }

        self.notify(&[MutationRecord {
            added_nodes: Vec::new(),
            removed_nodes: vec![node.clone()],
        }]);
        Some(node)
    }

    /// Returns a snapshot of the children.
    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        self.inner.children.lock().clone()
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.children.lock().len()
    }

    /// Returns the frame children in sequence order.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        self.inner
            .children
            .lock()
            .iter()
            .filter_map(Node::as_frame)
            .cloned()
            .collect()
    }

    /// Returns the number of frame children.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.inner
            .children
            .lock()
            .iter()
            .filter(|node| node.is_frame())
            .count()
    }

    /// Returns the first frame in the sequence.
    #[must_use]
    pub fn first_frame(&self) -> Option<Frame> {
        self.inner
            .children
            .lock()
            .iter()
            .find_map(Node::as_frame)
            .cloned()
    }

    /// Returns the last (newest) frame in the sequence.
    #[must_use]
    pub fn last_frame(&self) -> Option<Frame> {
        self.inner
            .children
            .lock()
            .iter()
            .rev()
            .find_map(Node::as_frame)
            .cloned()
    }

    /// Returns `true` if the frame is a child.
    #[must_use]
    pub fn contains_frame(&self, frame: &Frame) -> bool {
        self.inner
            .children
            .lock()
            .iter()
            .any(|node| node.as_frame() == Some(frame))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pushes `node` to the end, moving it if it is an existing frame child.
fn insert_last(children: &mut Vec<Node>, node: Node) -> MutationRecord {
    let mut record = MutationRecord::default();

    if let Some(frame) = node.as_frame() {
        if let Some(index) = children
            .iter()
            .position(|existing| existing.as_frame() == Some(frame))
        {
            record.removed_nodes.push(children.remove(index));
        }
        frame.set_attached(true);
        debug!(frame_id = %frame.id(), "Frame appended");
    }

    children.push(node.clone());
    record.added_nodes.push(node);
    record
}

// ============================================================================
// Tests
// ============================================================================
