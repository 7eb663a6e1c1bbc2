//! Delayed swap scheduling.
//!
//! When a frame becomes ready the scheduler captures the outgoing scroll
//! offset, emits `frame-loaded`, and starts a one-shot timer. When the timer
//! fires, the newest frame in the container (recomputed at that moment) is
//! shown and every older frame is removed.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::host::{Frame, Visibility};
use crate::identifiers::FrameId;
use crate::protocol::EventKind;

use super::core::SwapperInner;
use super::state::FrameState;

// ============================================================================
// SwapperInner - Readiness
// ============================================================================

impl SwapperInner {
    /// Completion handler for a frame's readiness subscription.
    ///
    /// Inert for frames that are untracked, detached, or not awaiting
    /// readiness.
    pub(crate) fn handle_ready(self: &Arc<Self>, frame: &Frame) {
        let frame_id = frame.id();

        let captured = {
            let mut state = self.state.lock();
            let Some(entry) = state.frames.get_mut(&frame_id) else {
                trace!(%frame_id, "Readiness for untracked frame ignored");
                return;
            };
            if entry.state != FrameState::AwaitingReadiness || !frame.is_attached() {
                trace!(%frame_id, state = ?entry.state, "Late readiness ignored");
                return;
            }

            if let Some(readiness) = entry.readiness.take() {
                readiness.cancel();
            }
            entry.state = FrameState::Ready;

            let in_flight = state.pending_swap_count();
            if in_flight > 0 {
                warn!(
                    %frame_id,
                    in_flight,
                    "Overlapping swaps, scroll is captured from the first frame"
                );
            }

            if self.options.scroll_enabled() {
                state.last_captured_scroll = self
                    .container
                    .first_frame()
                    .and_then(|first| first.content_window())
                    .map(|content| content.scroll_y())
                    .unwrap_or(0);
            }
            state.last_captured_scroll
        };

        debug!(%frame_id, scroll_y = captured, "Frame ready");
        self.emit(EventKind::Loaded, frame);
        self.schedule_swap(frame_id);
    }

    /// Starts the swap timer for a ready frame.
    fn schedule_swap(self: &Arc<Self>, frame_id: FrameId) {
        let mut state = self.state.lock();
        let Some(entry) = state.frames.get_mut(&frame_id) else {
            return;
        };
        if entry.state != FrameState::Ready {
            trace!(%frame_id, state = ?entry.state, "Swap not scheduled");
            return;
        }

        let weak = Arc::downgrade(self);
        let delay = self.options.swap_delay();

        // Spawned under the state lock so the task cannot observe `Ready`.
        entry.timer = Some(self.runtime.spawn(async move {
            sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.execute_swap(frame_id);
            }
        }));
        entry.state = FrameState::Scheduled;

        debug!(%frame_id, delay_ms = self.options.swap_delay_ms, "Swap scheduled");
    }
}

// ============================================================================
// SwapperInner - Swap
// ============================================================================

impl SwapperInner {
    /// Timer body: shows the newest frame and removes the others.
    pub(crate) fn execute_swap(self: &Arc<Self>, frame_id: FrameId) {
        let offset = {
            let mut state = self.state.lock();
            match state.frames.get_mut(&frame_id) {
                Some(entry) if entry.state == FrameState::Scheduled => {
                    entry.timer = None;
                    entry.state = FrameState::Swapped;
                }
                _ => {
                    trace!(%frame_id, "Cancelled swap ignored");
                    return;
                }
            }
            state.prune_retired();
            state.last_captured_scroll
        };

        let frames = self.container.frames();
        let Some((newest, stale)) = frames.split_last() else {
            debug!(%frame_id, "Swap with no frames");
            return;
        };

        newest.set_visibility(Visibility::Visible);
        if self.options.scroll_enabled()
            && offset != 0
            && let Some(content) = newest.content_window()
        {
            content.scroll_to(0, offset);
        }

        debug!(
            %frame_id,
            visible = %newest.id(),
            removed = stale.len(),
            scroll_y = offset,
            "Swap executed"
        );

        for frame in stale {
            if self.container.remove_frame(frame).is_err() {
                trace!(frame_id = %frame.id(), "Stale frame already removed");
                continue;
            }
            self.retire(frame);
            self.emit(EventKind::Swapped, frame);
        }
    }

    /// Cancels a removed frame's pending readiness and timer.
    pub(crate) fn retire(&self, frame: &Frame) {
        if self.state.lock().retire(frame.id()) {
            debug!(frame_id = %frame.id(), "Frame retired");
        }
    }
}
