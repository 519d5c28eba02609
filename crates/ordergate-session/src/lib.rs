//! Authentication session management for ordergate.
//!
//! This crate owns the single fact the rest of the page keeps asking
//! about: is the visitor signed in, and as whom?
//!
//! 1. **Session**: the authenticated flag and identity ([`Session`])
//! 2. **Persistence**: best-effort key-value storage that survives a
//!    reload ([`PersistentSessionStore`] over any [`KeyValueStore`])
//! 3. **Transitions**: restore, login, logout, and the account label
//!    refresh that follows each one ([`AuthSessionManager`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Coordinator (above)  ← asks "authenticated?", calls login/logout
//!     ↕
//! Session Layer (this crate)  ← owns Session, persists it, refreshes the label
//!     ↕
//! Surface (below)  ← account button text/title, account menu visibility
//! ```
//!
//! # Trust model
//!
//! There is no credential check: `login` accepts whatever identity it is
//! given. This is a demo; a real deployment must verify credentials
//! before calling it.

mod error;
mod manager;
mod session;
mod store;

pub use error::StoreError;
pub use manager::{AccountAffordance, AuthSessionManager};
pub use session::{AccountLabel, Session};
pub use store::{
    IDENTITY_KEY, JsonFileStore, KeyValueStore, LOGGED_IN_FLAG, LOGGED_IN_KEY,
    MemoryStore, PersistentSessionStore, StorageBackend, StorageConfig,
    UnavailableStore,
};
