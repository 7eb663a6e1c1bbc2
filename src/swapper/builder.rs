//! Builder pattern for swapper attachment.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use frame_swapper::{Container, FrameSwapper};
//!
//! # fn example() -> frame_swapper::Result<()> {
//! let swapper = FrameSwapper::builder()
//!     .container(Container::new())
//!     .swap_delay(Duration::from_millis(250))
//!     .listen_for("content-ready")
//!     .attach()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::config::SwapperOptions;
use crate::error::{Error, Result};
use crate::host::{Container, HostWindow};

use super::core::FrameSwapper;

// ============================================================================
// SwapperBuilder
// ============================================================================

/// Builder for attaching a [`FrameSwapper`].
///
/// Options start from the container's attributes unless replaced with
/// [`SwapperBuilder::options`]; the individual setters override on top.
#[derive(Debug, Default, Clone)]
pub struct SwapperBuilder {
    container: Option<Container>,
    window: Option<HostWindow>,
    options: Option<SwapperOptions>,
    swap_delay: Option<Duration>,
    listen_for: Option<String>,
    disable_scroll: bool,
}

// ============================================================================
// SwapperBuilder Implementation
// ============================================================================

impl SwapperBuilder {
    /// Creates a builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container to manage.
    #[inline]
    #[must_use]
    pub fn container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    /// Sets the host window that frame content posts to.
    ///
    /// Defaults to a fresh window, reachable via [`FrameSwapper::window`].
    #[inline]
    #[must_use]
    pub fn window(mut self, window: HostWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Uses these options instead of the container's attributes.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: SwapperOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Overrides the swap delay.
    #[inline]
    #[must_use]
    pub fn swap_delay(mut self, delay: Duration) -> Self {
        self.swap_delay = Some(delay);
        self
    }

    /// Overrides the readiness message type.
    #[inline]
    #[must_use]
    pub fn listen_for(mut self, event_name: impl Into<String>) -> Self {
        self.listen_for = Some(event_name.into());
        self
    }

    /// Disables scroll transfer.
    #[inline]
    #[must_use]
    pub fn disable_scroll(mut self) -> Self {
        self.disable_scroll = true;
        self
    }

    /// Resolves options and attaches the swapper.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no container is set or options are invalid
    /// - [`Error::NoRuntime`] if called outside a tokio runtime
    pub fn attach(self) -> Result<FrameSwapper> {
        let container = self.container.ok_or_else(|| {
            Error::config(
                "Container is required. Use .container() to set it.\n\
                 Example: FrameSwapper::builder().container(Container::new())",
            )
        })?;

        let mut options = self
            .options
            .unwrap_or_else(|| SwapperOptions::from_attributes(&container.attributes()));

        if let Some(delay) = self.swap_delay {
            options = options.with_swap_delay(delay);
        }
        if let Some(name) = self.listen_for {
            options = options.with_listen_for(name);
        }
        if self.disable_scroll {
            options = options.with_scroll_disabled();
        }

        FrameSwapper::attach_with(container, self.window.unwrap_or_default(), options)
    }
}

// ============================================================================
// Tests
// ============================================================================
