//! Frame Swapper - Flicker-free replacement of embedded content frames.
//!
//! This library keeps a container showing exactly one content frame. New
//! frames are pre-loaded hidden next to the visible one; once the newcomer
//! is ready, it is shown and the old frames are removed.
//!
//! # Architecture
//!
//! The swapper sits between a host tree and its listeners:
//!
//! - **Host (embedding)**: Owns the [`Container`], its frames, and the
//!   [`HostWindow`] message bus; reports load completion and messages
//! - **Swapper**: Observes insertions, detects readiness, schedules swaps,
//!   and emits [`SwapperEvent`]s
//!
//! Key design principles:
//!
//! - Each [`FrameSwapper`] owns: one container observer + per-frame state
//! - Readiness is either native load completion or a typed message
//! - Swap timers run on the tokio runtime the swapper was attached in
//! - Event-driven architecture (no polling)
//!
//! # Quick Start
//!
//! ```no_run
//! use frame_swapper::{Container, EventKind, FrameSwapper, HostWindow, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let container = Container::new().with_attribute("swap-delay", "250")?;
//!     let swapper = FrameSwapper::attach(container, HostWindow::new())?;
//!
//!     swapper.add_event_listener(EventKind::Swapped, |event| {
//!         println!("Removed frame {}", event.frame().id());
//!     });
//!
//!     let frame = swapper.add_frame([("src", "/articles/2")])?;
//!
//!     // The embedding reports that the frame's document finished loading.
//!     frame.complete_load();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Options and attribute parsing |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | Host tree: [`Container`], [`Frame`], [`HostWindow`] |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Messages and emitted events |
//! | [`swapper`] | The [`FrameSwapper`] engine |

// ============================================================================
// Modules
// ============================================================================

/// Swapper options.
///
/// Read from container attributes or built with [`SwapperOptions::new()`].
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Host tree entities driven by the embedding.
pub mod host;

/// Type-safe identifiers for frames, contexts, and subscriptions.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Message and event types.
pub mod protocol;

/// Frame swapping engine.
pub mod swapper;

// ============================================================================
// Re-exports
// ============================================================================

// Config types
pub use config::{DEFAULT_SWAP_DELAY_MS, SwapperOptions};

// Error types
pub use error::{Error, Result};

// Host types
pub use host::{
    Container, ContentWindow, Element, Frame, HostWindow, MutationRecord, Node, ScrollPosition,
    Visibility,
};

// Identifier types
pub use identifiers::{ContextId, FrameId, ObserverId, SubscriptionId};

// Protocol types
pub use protocol::{EventKind, Message, SwapperEvent};

// Swapper types
pub use swapper::{EventCallback, FrameState, FrameSwapper, ReadinessStrategy, SwapperBuilder};
