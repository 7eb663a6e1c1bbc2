//! Per-frame lifecycle state.
//!
//! The swapper keeps one [`FrameEntry`] per tracked frame, keyed by
//! [`FrameId`]. An entry owns the frame's pending readiness subscription and
//! its swap timer, so cancelling a frame is a single arena operation.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::host::Frame;
use crate::identifiers::FrameId;

use super::readiness::PendingReadiness;

// ============================================================================
// FrameState
// ============================================================================

/// Lifecycle state of a tracked frame.
///
/// ```text
/// Inserted → AwaitingReadiness → Ready → Scheduled → Swapped
///     └──────────────┴──────────────┴───────┴──────→ Superseded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameState {
    /// Observed as a new child; readiness not armed yet.
    Inserted,
    /// Readiness subscription pending.
    AwaitingReadiness,
    /// Readiness fired; scroll captured.
    Ready,
    /// Swap timer running.
    Scheduled,
    /// The frame's own swap ran.
    Swapped,
    /// Removed before its swap ran.
    Superseded,
}

impl FrameState {
    /// Returns `true` for `Swapped` and `Superseded`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Swapped | Self::Superseded)
    }
}

// ============================================================================
// FrameEntry
// ============================================================================

/// Arena slot for one frame.
pub(crate) struct FrameEntry {
    pub frame: Frame,
    pub state: FrameState,
    pub readiness: Option<PendingReadiness>,
    pub timer: Option<JoinHandle<()>>,
}

impl fmt::Debug for FrameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameEntry")
            .field("frame_id", &self.frame.id())
            .field("state", &self.state)
            .field("readiness_pending", &self.readiness.is_some())
            .field("timer_pending", &self.timer.is_some())
            .finish()
    }
}

impl FrameEntry {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            state: FrameState::Inserted,
            readiness: None,
            timer: None,
        }
    }

    /// Drops the readiness subscription and aborts the swap timer.
    pub fn cancel(&mut self) {
        if let Some(readiness) = self.readiness.take() {
            readiness.cancel();
        }
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

// ============================================================================
// SwapState
// ============================================================================

/// Mutable swapper state shared by the watcher, detector, and scheduler.
#[derive(Debug, Default)]
pub(crate) struct SwapState {
    pub frames: FxHashMap<FrameId, FrameEntry>,
    /// Frames removed since the last swap; kept for introspection until then.
    pub retired: Vec<FrameId>,
    /// Vertical offset captured at the latest readiness. Last writer wins.
    pub last_captured_scroll: i32,
}

impl SwapState {
    /// Starts tracking `frame`, replacing and cancelling any previous entry.
    pub fn track(&mut self, frame: &Frame) {
        let id = frame.id();
        if let Some(mut previous) = self.frames.insert(id, FrameEntry::new(frame.clone())) {
            previous.cancel();
        }
        self.retired.retain(|retired| *retired != id);
    }

    /// Cancels a removed frame's pending work.
    ///
    /// Non-terminal frames become `Superseded`. Returns `false` if the frame
    /// is untracked or already retired.
    pub fn retire(&mut self, id: FrameId) -> bool {
        if self.retired.contains(&id) {
            return false;
        }
        let Some(entry) = self.frames.get_mut(&id) else {
            return false;
        };

        entry.cancel();
        if !entry.state.is_terminal() {
            entry.state = FrameState::Superseded;
        }
        self.retired.push(id);
        true
    }

    /// Forgets frames retired before the current swap.
    pub fn prune_retired(&mut self) {
        for id in self.retired.drain(..) {
            self.frames.remove(&id);
        }
    }

    pub fn state_of(&self, id: FrameId) -> Option<FrameState> {
        self.frames.get(&id).map(|entry| entry.state)
    }

    pub fn pending_readiness_count(&self) -> usize {
        self.frames
            .values()
            .filter(|entry| entry.readiness.is_some())
            .count()
    }

    pub fn pending_swap_count(&self) -> usize {
        self.frames
            .values()
            .filter(|entry| entry.state == FrameState::Scheduled)
            .count()
    }
}

// ============================================================================
// Tests
// ============================================================================
