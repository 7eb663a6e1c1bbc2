//! Cross-context message type.
//!
//! Frame content announces readiness by posting a message to the host
//! window. The message carries the sender's content context as its source
//! and a JSON payload.
//!
//! # Format
//!
//! ```json
//! {
//!   "source": "6f1c2b9e-...",
//!   "data": { "type": "content-ready" }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::identifiers::ContextId;

// ============================================================================
// Message
// ============================================================================

/// A message posted to the host window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Content context that posted the message, if known.
    pub source: Option<ContextId>,

    /// Arbitrary payload.
    pub data: Value,
}

impl Message {
    /// Creates a new message.
    #[inline]
    #[must_use]
    pub fn new(source: Option<ContextId>, data: Value) -> Self {
        Self { source, data }
    }

    /// Creates a message posted by the given content context.
    #[inline]
    #[must_use]
    pub fn from_context(source: ContextId, data: Value) -> Self {
        Self::new(Some(source), data)
    }

    /// Creates a `{ "type": event_name }` message from the given context.
    ///
    /// This is the shape the readiness protocol expects.
    #[inline]
    #[must_use]
    pub fn typed(source: ContextId, event_name: &str) -> Self {
        Self::from_context(source, json!({ "type": event_name }))
    }

    /// Parses a raw JSON payload into a message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the payload is not valid JSON.
    pub fn from_json(source: Option<ContextId>, raw: &str) -> Result<Self> {
        let data = serde_json::from_str(raw)?;
        Ok(Self::new(source, data))
    }
}

// ============================================================================
// Message - Accessors
// ============================================================================

impl Message {
    /// Returns the payload's `type` field, if it is a string.
    #[inline]
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.data.get("type").and_then(|v| v.as_str())
    }

    /// Returns `true` if the message was posted by `context`.
    #[inline]
    #[must_use]
    pub fn is_from(&self, context: ContextId) -> bool {
        self.source == Some(context)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_message() {
        let ctx = ContextId::generate();
        let message = Message::typed(ctx, "custom-event");

        assert!(message.is_from(ctx));
        assert_eq!(message.message_type(), Some("custom-event"));
    }

    #[test]
    fn test_message_type_missing() {
        let message = Message::new(None, json!({ "kind": "custom-event" }));
        assert_eq!(message.message_type(), None);
    }

    #[test]
    fn test_message_type_non_object() {
        let message = Message::new(None, json!("custom-event"));
        assert_eq!(message.message_type(), None);

        let message = Message::new(None, Value::Null);
        assert_eq!(message.message_type(), None);
    }

    #[test]
    fn test_message_type_non_string() {
        let message = Message::new(None, json!({ "type": 5 }));
        assert_eq!(message.message_type(), None);
    }

    #[test]
    fn test_anonymous_message_is_from_nobody() {
        let message = Message::new(None, json!({ "type": "x" }));
        assert!(!message.is_from(ContextId::generate()));
    }

    #[test]
    fn test_from_json() {
        let ctx = ContextId::generate();
        let message =
            Message::from_json(Some(ctx), r#"{ "type": "ready", "href": "/next" }"#)
                .expect("parse message");

        assert_eq!(message.message_type(), Some("ready"));
        assert_eq!(message.data["href"], "/next");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(Message::from_json(None, "not json").is_err());
    }
}
