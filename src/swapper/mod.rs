//! Frame swapping engine.
//!
//! A [`FrameSwapper`] observes one container. Every frame appended to it is
//! announced, armed for readiness, and, once ready, triggers a delayed swap
//! that shows the newest frame and removes the older ones.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | FrameSwapper struct, attach and detach |
//! | `builder` | Attachment builder |
//! | `watcher` | Container observation |
//! | `readiness` | Native and message-based readiness |
//! | `scheduler` | Scroll capture, delay timer, swap |
//! | `state` | Per-frame lifecycle arena |
//! | `events` | Event listeners and streams |
//! | `mutator` | Frame creation |
//!
//! # Example
//!
//! ```no_run
//! use frame_swapper::{Container, EventKind, FrameSwapper};
//!
//! # fn example(container: Container) -> frame_swapper::Result<()> {
//! let swapper = FrameSwapper::builder()
//!     .container(container.clone())
//!     .listen_for("content-ready")
//!     .attach()?;
//!
//! swapper.add_event_listener(EventKind::Swapped, |event| {
//!     println!("frame {} removed", event.frame().id());
//! });
//!
//! swapper.add_frame([("src", "/page/2")])?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod builder;
pub(crate) mod core;
mod events;
mod mutator;
mod readiness;
mod scheduler;
mod state;
mod watcher;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SwapperBuilder;
pub use core::FrameSwapper;
pub use events::EventCallback;
pub use readiness::ReadinessStrategy;
pub use state::FrameState;
