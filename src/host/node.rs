//! Child nodes of a container.

use crate::error::{Error, Result};

use super::Frame;

// ============================================================================
// Node
// ============================================================================

/// A direct child of a [`Container`](super::Container).
///
/// Only [`Node::Frame`] children take part in swaps; every other node is
/// ignored by the swapper but still occupies a position in the sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An embedded content frame.
    Frame(Frame),
    /// Any other element.
    Element(Element),
    /// A text node.
    Text(String),
}

impl Node {
    /// Returns the lowercase tag name, or `None` for text.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Frame(_) => Some("iframe"),
            Self::Element(element) => Some(element.tag()),
            Self::Text(_) => None,
        }
    }

    /// Returns the frame if this node is one.
    #[inline]
    #[must_use]
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Returns `true` if this node is a frame.
    #[inline]
    #[must_use]
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }
}

impl From<Frame> for Node {
    fn from(frame: Frame) -> Self {
        Self::Frame(frame)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

// ============================================================================
// Element
// ============================================================================

/// A non-frame element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
}

impl Element {
    /// Creates an element with the given tag, normalized to lowercase.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
        }
    }

    /// Returns the tag name.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Checks that `name` is usable as a markup attribute name.
pub(crate) fn validate_attribute_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=')
        });

    if valid {
        Ok(())
    } else {
        Err(Error::invalid_attribute(name))
    }
}

// ============================================================================
// Tests
// ============================================================================
