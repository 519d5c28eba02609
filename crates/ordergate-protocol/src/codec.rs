//! Codec trait and implementations for cross-context messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The page never cares HOW a message was serialized; it only needs
//! something that implements [`Codec`]. [`JsonCodec`] matches what a
//! browser `postMessage` carries when the sender posts a plain object.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `'static` because the codec is stored inside the long-lived page
/// runtime alongside its other collaborators.
pub trait Codec: 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use ordergate_protocol::{Codec, InboundMessage, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg: InboundMessage = codec
///     .decode(br#"{"type":"login","identity":"a@b.com"}"#)
///     .unwrap();
/// assert_eq!(msg, InboundMessage::login("a@b.com"));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
