//! Message and event types.
//!
//! | Type | Direction | Purpose |
//! |------|-----------|---------|
//! | [`Message`] | Frame content → Host window | Readiness announcement |
//! | [`SwapperEvent`] | Swapper → Listeners | Lifecycle notification |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `event` | Emitted events and their kinds |
//! | `message` | Cross-context messages |

// ============================================================================
// Submodules
// ============================================================================

/// Emitted event types.
pub mod event;

/// Cross-context message type.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{EventKind, SwapperEvent};
pub use message::Message;
