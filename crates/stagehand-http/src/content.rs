//! Response payloads.
//!
//! [`Content`] is a structured payload that already knows its media type, as
//! produced by a template renderer or serializer. [`Payload`] is what an
//! [`ActionResult`](crate::ActionResult) carries: either such a `Content`, or
//! a raw string with an explicit media type.

use stagehand_core::{StagehandError, StagehandResult};

/// The media type used for raw string payloads when none is given.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// A rendered body together with its declared media type.
///
/// # Examples
///
/// ```
/// use stagehand_http::Content;
///
/// let content = Content::xml("<feed/>");
/// assert_eq!(content.content_type(), "application/xml");
/// assert_eq!(content.body(), "<feed/>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    body: String,
    content_type: String,
}

impl Content {
    /// Creates content with an explicit media type.
    pub fn new(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates `text/html` content.
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(body, "text/html")
    }

    /// Creates `text/plain` content.
    pub fn plain(body: impl Into<String>) -> Self {
        Self::new(body, "text/plain")
    }

    /// Creates `application/xml` content.
    pub fn xml(body: impl Into<String>) -> Self {
        Self::new(body, "application/xml")
    }

    /// Serializes `data` as `application/json` content.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::SerializationError`] if serialization fails.
    pub fn json<T: serde::Serialize + ?Sized>(data: &T) -> StagehandResult<Self> {
        serde_json::to_string(data)
            .map(|json| Self::new(json, "application/json"))
            .map_err(|e| StagehandError::SerializationError(format!("JSON serialization error: {e}")))
    }

    /// Returns the rendered body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the declared media type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// The body of an [`ActionResult`](crate::ActionResult).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Structured content served at its own media type.
    Content(Content),
    /// A raw string served at the given media type.
    Text {
        /// The response body.
        body: String,
        /// The media type of `body`.
        content_type: String,
    },
}

impl Payload {
    /// Creates a raw string payload with an explicit media type.
    pub fn text(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::Text {
            body: body.into(),
            content_type: content_type.into(),
        }
    }

    /// Returns the body.
    pub fn body(&self) -> &str {
        match self {
            Self::Content(content) => content.body(),
            Self::Text { body, .. } => body,
        }
    }

    /// Returns the media type.
    pub fn content_type(&self) -> &str {
        match self {
            Self::Content(content) => content.content_type(),
            Self::Text { content_type, .. } => content_type,
        }
    }
}

impl From<Content> for Payload {
    fn from(content: Content) -> Self {
        Self::Content(content)
    }
}

impl From<String> for Payload {
    fn from(body: String) -> Self {
        Self::text(body, DEFAULT_CONTENT_TYPE)
    }
}

impl From<&str> for Payload {
    fn from(body: &str) -> Self {
        Self::text(body, DEFAULT_CONTENT_TYPE)
    }
}
