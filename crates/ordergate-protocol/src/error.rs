//! Error types for the protocol layer.
//!
//! None of these ever reach the user: the page ignores any message it
//! cannot decode. They exist so the rejection can be logged with a reason.

/// Errors that can occur while encoding or decoding a cross-context message.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `type` tag, or
    /// a required field with the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but violates a protocol rule, e.g. a login
    /// event whose identity is empty.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
