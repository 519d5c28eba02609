//! Shared vocabulary for ordergate.
//!
//! This crate defines the small set of types every other layer speaks:
//!
//! - **Types** ([`ElementId`], [`InboundMessage`]): how page elements are
//!   named, and what a different browsing context (the standalone login
//!   window) may post to the page.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how cross-context
//!   messages are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! ```text
//! Login window ──(postMessage JSON)──→ Protocol (InboundMessage) ──→ Coordinator
//! ```
//!
//! The protocol layer knows nothing about sessions or overlays. It only
//! knows how to name things and how to parse what arrives from outside.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ElementId, InboundMessage};
