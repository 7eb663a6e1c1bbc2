//! Frame creation entry point.

use tracing::debug;

use crate::error::Result;
use crate::host::Frame;

use super::core::FrameSwapper;

// ============================================================================
// FrameSwapper - Mutator
// ============================================================================

impl FrameSwapper {
    /// Creates a frame with the given attributes and appends it.
    ///
    /// The new frame goes through the same observation path as any frame
    /// appended to the container directly.
    ///
    /// # Arguments
    ///
    /// * `attributes` - Attribute names and values to set on the frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttribute`](crate::Error::InvalidAttribute)
    /// if any name is invalid. Nothing is appended in that case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use frame_swapper::FrameSwapper;
    ///
    /// # fn example(swapper: &FrameSwapper) -> frame_swapper::Result<()> {
    /// let frame = swapper.add_frame([("src", "/articles/2"), ("title", "Article")])?;
    /// assert!(frame.is_attached());
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_frame<I, K, V>(&self, attributes: I) -> Result<Frame>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let frame = Frame::with_attributes(attributes)?;
        debug!(frame_id = %frame.id(), "Appending new frame");

        self.inner.container.append_child(frame.clone());
        Ok(frame)
    }
}

// ============================================================================
// Tests
// ============================================================================
