//! Unified error type for ordergate.

use std::path::PathBuf;

use ordergate_protocol::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// The page's interaction operations never fail: bad messages are
/// dropped and storage problems are absorbed inside the session layer,
/// so no storage variant exists here. What remains fallible is
/// the plumbing around them: loading a config, encoding a message to
/// post, and talking to a page that has already shut down.
#[derive(Debug, thiserror::Error)]
pub enum OrdergateError {
    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The config file isn't valid JSON for [`PageConfig`](crate::PageConfig).
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),

    /// The config file couldn't be read.
    #[error("failed to read page config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The page loop has stopped and no longer accepts events.
    #[error("page event channel closed")]
    ChannelClosed,
}
