//! Error types for the session layer.

/// Errors a [`KeyValueStore`](crate::KeyValueStore) backend can report.
///
/// These never leave the crate's public session API:
/// [`PersistentSessionStore`](crate::PersistentSessionStore) logs them and
/// carries on with in-memory state. They exist so backends can use `?`
/// and so the log line says what actually went wrong.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage is switched off or refused access (quota, sandboxing,
    /// private browsing).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but isn't a flat JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
