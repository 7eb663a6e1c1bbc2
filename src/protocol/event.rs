//! Events emitted by the swapper.
//!
//! Every event carries the frame it concerns: the inserted frame, the frame
//! that became ready, or the stale frame that a swap removed.
//!
//! # Event Types
//!
//! | Kind | Name | Payload |
//! |------|------|---------|
//! | [`EventKind::Added`] | `frame-added` | Newly inserted frame |
//! | [`EventKind::Loaded`] | `frame-loaded` | Frame whose readiness fired |
//! | [`EventKind::Swapped`] | `frame-swapped` | Frame removed by a swap |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::host::Frame;

// ============================================================================
// EventKind
// ============================================================================

/// Kind of swapper event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A frame was inserted into the container.
    #[serde(rename = "frame-added")]
    Added,

    /// A frame's readiness condition was satisfied.
    #[serde(rename = "frame-loaded")]
    Loaded,

    /// A stale frame was removed during a swap.
    #[serde(rename = "frame-swapped")]
    Swapped,
}

impl EventKind {
    /// All event kinds, in lifecycle order.
    pub const ALL: [EventKind; 3] = [Self::Added, Self::Loaded, Self::Swapped];

    /// Returns the event name.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "frame-added",
            Self::Loaded => "frame-loaded",
            Self::Swapped => "frame-swapped",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::config(format!("Unknown event name: {s}")))
    }
}

// ============================================================================
// SwapperEvent
// ============================================================================

/// An event dispatched to swapper listeners.
#[derive(Debug, Clone)]
pub struct SwapperEvent {
    kind: EventKind,
    frame: Frame,
}

impl SwapperEvent {
    /// Creates a new event.
    #[inline]
    #[must_use]
    pub fn new(kind: EventKind, frame: Frame) -> Self {
        Self { kind, frame }
    }

    /// Returns the event kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the event name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Returns the frame the event concerns.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Consumes the event, returning its frame.
    #[inline]
    #[must_use]
    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::Added.as_str(), "frame-added");
        assert_eq!(EventKind::Loaded.to_string(), "frame-loaded");
        assert_eq!(EventKind::Swapped.as_str(), "frame-swapped");
    }

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("frame-loaded".parse::<EventKind>().ok(), Some(EventKind::Loaded));
        assert!("frame-removed".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_event_kind_serializes_to_name() {
        let json = serde_json::to_string(&EventKind::Swapped).expect("serialize");
        assert_eq!(json, "\"frame-swapped\"");

        let kind: EventKind = serde_json::from_str("\"frame-added\"").expect("deserialize");
        assert_eq!(kind, EventKind::Added);
    }

    #[test]
    fn test_event_carries_frame() {
        let frame = Frame::new();
        let event = SwapperEvent::new(EventKind::Added, frame.clone());

        assert_eq!(event.kind(), EventKind::Added);
        assert_eq!(event.name(), "frame-added");
        assert_eq!(event.frame().id(), frame.id());
        assert_eq!(event.into_frame(), frame);
    }
}
