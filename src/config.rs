//! Swapper configuration.
//!
//! Options are read once when a swapper attaches to its container and are
//! not reactive afterwards. They can come from the container's markup
//! attributes, from JSON, or from the builder methods below.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use frame_swapper::SwapperOptions;
//!
//! let options = SwapperOptions::new()
//!     .with_swap_delay(Duration::from_millis(250))
//!     .with_listen_for("content-ready")
//!     .with_scroll_disabled();
//!
//! assert!(options.validate().is_ok());
//! ```
//!
//! # Attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `swap-delay` | Milliseconds between readiness and swap (default 100) |
//! | `listen-for` | Switches readiness to the message protocol for this type |
//! | `disable-scroll` | Suppresses scroll capture and restoration |

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default delay between readiness and swap, in milliseconds.
pub const DEFAULT_SWAP_DELAY_MS: u64 = 100;

/// Attribute holding the swap delay in milliseconds.
pub const SWAP_DELAY_ATTRIBUTE: &str = "swap-delay";

/// Attribute naming the readiness message type.
pub const LISTEN_FOR_ATTRIBUTE: &str = "listen-for";

/// Attribute whose presence disables scroll transfer.
pub const DISABLE_SCROLL_ATTRIBUTE: &str = "disable-scroll";

// ============================================================================
// SwapperOptions
// ============================================================================

/// Frame swapper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SwapperOptions {
    /// Milliseconds between a frame's readiness and the swap.
    #[serde(rename = "swap-delay")]
    pub swap_delay_ms: u64,

    /// Readiness message type. `None` selects native load completion.
    pub listen_for: Option<String>,

    /// Skip scroll capture and restoration.
    pub disable_scroll: bool,
}

impl Default for SwapperOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl SwapperOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            swap_delay_ms: DEFAULT_SWAP_DELAY_MS,
            listen_for: None,
            disable_scroll: false,
        }
    }

    /// Reads options from container attributes.
    ///
    /// Lenient like markup parsing: an unparsable `swap-delay` falls back to
    /// the default, and an empty `listen-for` means native load completion.
    #[must_use]
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Self {
        let mut options = Self::new();

        if let Some(raw) = attributes.get(SWAP_DELAY_ATTRIBUTE) {
            match parse_delay(raw) {
                Some(ms) => options.swap_delay_ms = ms,
                None if raw.trim().is_empty() => {}
                None => {
                    warn!(
                        value = %raw,
                        default_ms = DEFAULT_SWAP_DELAY_MS,
                        "Unparsable swap-delay, using default"
                    );
                }
            }
        }

        options.listen_for = attributes
            .get(LISTEN_FOR_ATTRIBUTE)
            .filter(|name| !name.trim().is_empty())
            .cloned();

        options.disable_scroll = attributes.contains_key(DISABLE_SCROLL_ATTRIBUTE);

        options
    }

    /// Parses options from a JSON object with kebab-case keys.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the input is not a valid options object
    /// - [`Error::Config`] if the parsed options fail validation
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SwapperOptions {
    /// Sets the swap delay.
    #[inline]
    #[must_use]
    pub fn with_swap_delay(mut self, delay: Duration) -> Self {
        self.swap_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Selects the message readiness protocol with the given type.
    #[inline]
    #[must_use]
    pub fn with_listen_for(mut self, event_name: impl Into<String>) -> Self {
        self.listen_for = Some(event_name.into());
        self
    }

    /// Disables scroll capture and restoration.
    #[inline]
    #[must_use]
    pub fn with_scroll_disabled(mut self) -> Self {
        self.disable_scroll = true;
        self
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl SwapperOptions {
    /// Returns the swap delay.
    #[inline]
    #[must_use]
    pub const fn swap_delay(&self) -> Duration {
        Duration::from_millis(self.swap_delay_ms)
    }

    /// Returns `true` if scroll position is carried across swaps.
    #[inline]
    #[must_use]
    pub const fn scroll_enabled(&self) -> bool {
        !self.disable_scroll
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `listen_for` is set but empty.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.listen_for
            && name.trim().is_empty()
        {
            return Err(Error::config("listen-for must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses a delay attribute; fractional values are rounded.
fn parse_delay(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();

    if let Ok(ms) = trimmed.parse::<u64>() {
        return Some(ms);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms.round() as u64)
}

// ============================================================================
// Tests
// ============================================================================
