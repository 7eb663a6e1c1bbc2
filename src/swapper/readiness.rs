//! Readiness detection.
//!
//! A frame is ready either when its content finishes loading natively, or,
//! when a `listen-for` name is configured, when its content posts a
//! `{ "type": <name> }` message to the host window. The strategy is chosen
//! once per swapper. Each armed subscription fires at most once.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::config::SwapperOptions;
use crate::host::{Frame, HostWindow};
use crate::identifiers::SubscriptionId;
use crate::protocol::Message;

use super::core::SwapperInner;
use super::state::FrameState;

// ============================================================================
// Types
// ============================================================================

/// Completion handler invoked once per armed frame.
pub(crate) type ReadyCallback = Arc<dyn Fn(&Frame) + Send + Sync>;

// ============================================================================
// ReadinessStrategy
// ============================================================================

/// How a swapper decides that a frame has finished loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessStrategy {
    /// The frame's native load completion.
    NativeCompletion,
    /// A message from the frame's content whose `type` equals the name.
    MessageMatch(String),
}

impl ReadinessStrategy {
    /// Selects the strategy for the given options.
    #[must_use]
    pub fn from_options(options: &SwapperOptions) -> Self {
        match &options.listen_for {
            Some(name) => Self::MessageMatch(name.clone()),
            None => Self::NativeCompletion,
        }
    }

    /// Returns the awaited message type, if any.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        match self {
            Self::NativeCompletion => None,
            Self::MessageMatch(name) => Some(name),
        }
    }

    /// Returns `true` if `message` announces that `frame` is ready.
    ///
    /// The source must be the frame's current content context, so messages
    /// for a detached frame never match.
    #[must_use]
    pub fn matches(&self, frame: &Frame, message: &Message) -> bool {
        match self {
            Self::NativeCompletion => false,
            Self::MessageMatch(name) => {
                frame
                    .content_window()
                    .is_some_and(|content| message.is_from(content.context_id()))
                    && message.message_type() == Some(name.as_str())
            }
        }
    }

    /// Registers a one-shot readiness subscription for `frame`.
    pub(crate) fn arm(
        &self,
        frame: &Frame,
        window: &HostWindow,
        on_ready: ReadyCallback,
    ) -> PendingReadiness {
        let fired = Arc::new(AtomicBool::new(false));

        match self {
            Self::NativeCompletion => {
                frame.set_onload(move |frame: &Frame| {
                    if !fired.swap(true, Ordering::AcqRel) {
                        on_ready(frame);
                    }
                });
                PendingReadiness::Native {
                    frame: frame.clone(),
                }
            }

            Self::MessageMatch(_) => {
                let strategy = self.clone();
                let target = frame.clone();
                let subscription = window.add_message_listener(move |message: &Message| {
                    if !strategy.matches(&target, message) {
                        trace!(
                            frame_id = %target.id(),
                            source = ?message.source,
                            message_type = ?message.message_type(),
                            "Message ignored"
                        );
                        return;
                    }
                    if !fired.swap(true, Ordering::AcqRel) {
                        on_ready(&target);
                    }
                });
                PendingReadiness::Message {
                    window: window.clone(),
                    subscription,
                }
            }
        }
    }
}

// ============================================================================
// PendingReadiness
// ============================================================================

/// A live readiness subscription bound to one frame.
pub(crate) enum PendingReadiness {
    /// Load handler installed on the frame.
    Native { frame: Frame },
    /// Message listener registered on the host window.
    Message {
        window: HostWindow,
        subscription: SubscriptionId,
    },
}

impl fmt::Debug for PendingReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { frame } => f
                .debug_struct("Native")
                .field("frame_id", &frame.id())
                .finish(),
            Self::Message { subscription, .. } => f
                .debug_struct("Message")
                .field("subscription", subscription)
                .finish(),
        }
    }
}

impl PendingReadiness {
    /// Releases the subscription.
    pub fn cancel(self) {
        match self {
            Self::Native { frame } => frame.clear_onload(),
            Self::Message {
                window,
                subscription,
            } => {
                window.remove_message_listener(subscription);
            }
        }
    }
}

// ============================================================================
// SwapperInner - Arming
// ============================================================================

impl SwapperInner {
    /// Arms the readiness subscription for a newly tracked frame.
    ///
    /// Skipped if the frame was removed or re-tracked since insertion.
    pub(crate) fn arm_readiness(self: &Arc<Self>, frame: &Frame) {
        let mut state = self.state.lock();
        let Some(entry) = state.frames.get_mut(&frame.id()) else {
            return;
        };
        if entry.state != FrameState::Inserted || !frame.is_attached() {
            trace!(frame_id = %frame.id(), state = ?entry.state, "Readiness not armed");
            return;
        }

        let weak = Arc::downgrade(self);
        let on_ready: ReadyCallback = Arc::new(move |frame: &Frame| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_ready(frame);
            }
        });

        entry.readiness = Some(self.strategy.arm(frame, &self.window, on_ready));
        entry.state = FrameState::AwaitingReadiness;

        debug!(frame_id = %frame.id(), strategy = ?self.strategy, "Readiness armed");
    }
}

// ============================================================================
// Tests
// ============================================================================
