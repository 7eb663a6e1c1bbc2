//! Container observation.
//!
//! The swapper registers one insertion observer on its container while
//! attached. Inserted frames are announced and armed; removed frames are
//! retired so their pending subscriptions go inert.

use std::sync::Arc;

use tracing::debug;

use crate::host::{Frame, MutationRecord};
use crate::protocol::EventKind;

use super::core::SwapperInner;

// ============================================================================
// SwapperInner - Observation
// ============================================================================

impl SwapperInner {
    /// Registers the insertion observer.
    pub(crate) fn start_observing(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let id = self.container.observe(move |batch: &[MutationRecord]| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_mutations(batch);
            }
        });
        *self.observer.lock() = Some(id);
    }

    /// Releases the insertion observer. Returns `false` if not observing.
    pub(crate) fn stop_observing(&self) -> bool {
        match self.observer.lock().take() {
            Some(id) => self.container.disconnect(id),
            None => false,
        }
    }

    /// Handles one batch of child-list changes.
    fn handle_mutations(self: &Arc<Self>, batch: &[MutationRecord]) {
        for record in batch {
            for frame in record.removed_frames() {
                self.retire(frame);
            }
            for frame in record.added_frames() {
                self.track(frame);
            }
        }
    }

    /// Announces a new frame and arms its readiness.
    fn track(self: &Arc<Self>, frame: &Frame) {
        self.state.lock().track(frame);
        debug!(frame_id = %frame.id(), "Frame added");

        self.emit(EventKind::Added, frame);
        self.arm_readiness(frame);
    }
}
