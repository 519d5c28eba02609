//! Core types shared by every ordergate layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Codec, ProtocolError};

// ---------------------------------------------------------------------------
// ElementId
// ---------------------------------------------------------------------------

/// Opaque handle naming one element of the page (a button, an overlay
/// backdrop, an input field).
///
/// Every component that touches the page receives the handles it needs
/// explicitly instead of looking elements up by itself. In particular the
/// element that regains focus when a modal closes is always passed in by
/// whoever opened the modal.
///
/// `#[serde(transparent)]` keeps the JSON form a plain string, so page
/// configs read naturally: `"login_button": "loginBtn"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Creates a handle from any string-like id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// InboundMessage
// ---------------------------------------------------------------------------

/// A message posted to the page from a different browsing context.
///
/// The only message the page understands is a completed login:
///
/// ```json
/// { "type": "login", "identity": "a@b.com" }
/// ```
///
/// The standalone login page posts the identity under `email`, so that
/// key is accepted as an alias. Anything else fails to decode and is
/// ignored by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundMessage {
    /// A login completed elsewhere; the page should treat it exactly like
    /// an in-page login form submission.
    Login {
        #[serde(alias = "email")]
        identity: String,
    },
}

impl InboundMessage {
    /// Shorthand for building a [`InboundMessage::Login`].
    pub fn login(identity: impl Into<String>) -> Self {
        Self::Login {
            identity: identity.into(),
        }
    }

    /// Decodes and validates a raw message.
    ///
    /// # Errors
    /// - [`ProtocolError::Decode`] if the bytes are not a recognised shape.
    /// - [`ProtocolError::InvalidMessage`] if the shape is right but the
    ///   content is unusable (blank identity).
    pub fn decode<C: Codec>(
        codec: &C,
        data: &[u8],
    ) -> Result<Self, ProtocolError> {
        let msg: Self = codec.decode(data)?;
        msg.validated()
    }

    /// Rejects messages that decode cleanly but carry no usable identity.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for a blank identity.
    pub fn validated(self) -> Result<Self, ProtocolError> {
        match &self {
            Self::Login { identity } if identity.trim().is_empty() => {
                Err(ProtocolError::InvalidMessage(
                    "login message without identity".into(),
                ))
            }
            Self::Login { .. } => Ok(self),
        }
    }
}
