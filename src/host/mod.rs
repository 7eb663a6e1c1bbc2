//! Host tree entities.
//!
//! The swapper never owns the page it lives in; it manipulates these
//! handles, which an embedding (or a test) drives.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Container`] | Element hosting the frame sequence; insertion notifier |
//! | [`Frame`] | Embedded content frame |
//! | [`ContentWindow`] | A frame's content context (identity, scroll) |
//! | [`HostWindow`] | Top-level message bus |
//! | [`Node`] | Any direct child of a container |
//!
//! # Example
//!
//! ```no_run
//! use frame_swapper::{Container, Frame};
//!
//! # fn example() -> frame_swapper::Result<()> {
//! let container = Container::new();
//!
//! let frame = Frame::with_attributes([("src", "/next")])?;
//! container.append_child(frame.clone());
//!
//! // The embedding reports completion when the content document loads.
//! frame.complete_load();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod container;
mod content;
mod frame;
mod node;
mod window;

// ============================================================================
// Re-exports
// ============================================================================

pub use container::{Container, MutationCallback, MutationRecord};
pub use content::{ContentWindow, ScrollPosition};
pub use frame::{Frame, LoadHandler, Visibility};
pub use node::{Element, Node};
pub use window::{HostWindow, MessageHandler};
