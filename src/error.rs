//! Error types for the frame swapper.
//!
//! The swap path itself never fails: late callbacks, missing frames and
//! mismatched messages are silent no-ops. Errors only surface while
//! configuring, attaching, or creating frames through the public mutator.
//!
//! # Usage
//!
//! ```no_run
//! use frame_swapper::{Container, FrameSwapper, HostWindow, Result};
//!
//! fn example(container: Container, window: HostWindow) -> Result<()> {
//!     let swapper = FrameSwapper::attach(container, window)?;
//!     swapper.add_frame([("src", "https://example.com")])?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::NoRuntime`] |
//! | Host tree | [`Error::InvalidAttribute`], [`Error::FrameNotFound`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::FrameId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when swapper options fail validation.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// No async runtime available.
    ///
    /// Returned when a swapper is attached outside a tokio runtime; the
    /// delayed swap needs one to schedule its timers.
    #[error("No tokio runtime available: {message}")]
    NoRuntime {
        /// Description from the runtime lookup.
        message: String,
    },

    // ========================================================================
    // Host Tree Errors
    // ========================================================================
    /// Attribute name is not a valid markup name.
    #[error("Invalid attribute name: {name:?}")]
    InvalidAttribute {
        /// The rejected attribute name.
        name: String,
    },

    /// Frame is not a child of the container.
    #[error("Frame not found: {frame_id}")]
    FrameNotFound {
        /// The missing frame ID.
        frame_id: FrameId,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a missing runtime error.
    #[inline]
    pub fn no_runtime(message: impl Into<String>) -> Self {
        Self::NoRuntime {
            message: message.into(),
        }
    }

    /// Creates an invalid attribute error.
    #[inline]
    pub fn invalid_attribute(name: impl Into<String>) -> Self {
        Self::InvalidAttribute { name: name.into() }
    }

    /// Creates a frame not found error.
    #[inline]
    pub fn frame_not_found(frame_id: FrameId) -> Self {
        Self::FrameNotFound { frame_id }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error comes from configuration or attachment.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::NoRuntime { .. } | Self::Json(_))
    }

    /// Returns `true` if this error concerns the host tree.
    #[inline]
    #[must_use]
    pub fn is_host_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAttribute { .. } | Self::FrameNotFound { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
