//! Best-effort persistence of the session across page reloads.
//!
//! The session is stored as two string keys, the same layout the
//! standalone login page writes:
//!
//! | key              | value                         |
//! |------------------|-------------------------------|
//! | `rr_logged_in`   | `"1"` when signed in, else absent |
//! | `rr_user_email`  | the identity, else absent     |
//!
//! Anything else (flag without identity, identity without flag, a flag
//! other than `"1"`, an empty identity) loads as a guest.
//!
//! # Failure policy
//!
//! Storage can be disabled, full, or sandboxed. None of that is allowed
//! to break the page: [`PersistentSessionStore`] catches every
//! [`StoreError`], logs it, and behaves as if persistence simply isn't
//! there for that call. The in-memory session owned by
//! [`AuthSessionManager`](crate::AuthSessionManager) stays authoritative.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Session, StoreError};

/// Key holding the signed-in flag.
pub const LOGGED_IN_KEY: &str = "rr_logged_in";
/// Key holding the signed-in identity.
pub const IDENTITY_KEY: &str = "rr_user_email";
/// The only flag value that counts as signed in.
pub const LOGGED_IN_FLAG: &str = "1";

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// A string key-value store, the shape of the browser's `localStorage`.
///
/// Every method may fail; callers decide what failure means.
pub trait KeyValueStore {
    /// Reads a key. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backing storage can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a key.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backing storage can't be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a key. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backing storage can't be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A `HashMap`-backed store. Never fails; forgets everything on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style pre-population, handy for simulating a reload.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A store kept as one flat JSON object in a file.
///
/// The file is read on every call and rewritten on every change, so two
/// pages sharing a file see each other's writes on their next read. A
/// missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is not touched until the
    /// first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// UnavailableStore
// ---------------------------------------------------------------------------

/// A store that refuses every call, like `localStorage` in a sandboxed
/// frame. Used when persistence is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage is disabled".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage is disabled".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage is disabled".into()))
    }
}

// ---------------------------------------------------------------------------
// StorageConfig / StorageBackend
// ---------------------------------------------------------------------------

/// Which backend to persist the session in.
///
/// In JSON: `{"kind":"memory"}`, `{"kind":"file","path":"session.json"}`,
/// or `{"kind":"disabled"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Keep the session in memory only.
    #[default]
    Memory,
    /// Keep the session in a JSON file.
    File { path: PathBuf },
    /// Refuse all persistence.
    Disabled,
}

/// A backend chosen at runtime from a [`StorageConfig`].
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStore),
    File(JsonFileStore),
    Disabled(UnavailableStore),
}

impl StorageBackend {
    /// Builds the backend a config asks for.
    pub fn from_config(config: &StorageConfig) -> Self {
        match config {
            StorageConfig::Memory => Self::Memory(MemoryStore::new()),
            StorageConfig::File { path } => {
                Self::File(JsonFileStore::new(path.clone()))
            }
            StorageConfig::Disabled => Self::Disabled(UnavailableStore),
        }
    }
}

impl KeyValueStore for StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::File(store) => store.get(key),
            Self::Disabled(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(key, value),
            Self::File(store) => store.set(key, value),
            Self::Disabled(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove(key),
            Self::File(store) => store.remove(key),
            Self::Disabled(store) => store.remove(key),
        }
    }
}

// ---------------------------------------------------------------------------
// PersistentSessionStore
// ---------------------------------------------------------------------------

/// Loads, saves, and clears a [`Session`] on top of a [`KeyValueStore`].
///
/// None of these methods return errors. A failed read loads as a guest;
/// a failed write is logged and forgotten.
#[derive(Debug, Clone, Default)]
pub struct PersistentSessionStore<K> {
    backend: K,
}

impl<K: KeyValueStore> PersistentSessionStore<K> {
    /// Wraps a backend.
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Unwraps the backend, e.g. to hand it to a fresh page on "reload".
    pub fn into_backend(self) -> K {
        self.backend
    }

    /// Reads the persisted session.
    ///
    /// Returns a guest session when nothing valid is stored or when the
    /// backend fails.
    pub fn load(&self) -> Session {
        match self.try_load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed, continuing as guest");
                Session::guest()
            }
        }
    }

    /// Persists `session`. Saving a guest clears the record.
    pub fn save(&mut self, session: &Session) {
        match session.identity() {
            None => self.clear(),
            Some(identity) => {
                if let Err(e) = self.try_save(identity) {
                    tracing::warn!(error = %e, "session not persisted");
                }
            }
        }
    }

    /// Removes the persisted session.
    pub fn clear(&mut self) {
        // Attempt both removals even if the first one fails, so a
        // half-working backend still loses as much as it can.
        let identity = self.backend.remove(IDENTITY_KEY);
        let flag = self.backend.remove(LOGGED_IN_KEY);
        if let Err(e) = identity.and(flag) {
            tracing::warn!(error = %e, "persisted session not cleared");
        }
    }

    fn try_load(&self) -> Result<Session, StoreError> {
        let flag = self.backend.get(LOGGED_IN_KEY)?;
        let identity = self.backend.get(IDENTITY_KEY)?;

        Ok(match (flag.as_deref(), identity) {
            (Some(LOGGED_IN_FLAG), Some(identity)) => Session::authenticated(identity),
            _ => Session::guest(),
        })
    }

    fn try_save(&mut self, identity: &str) -> Result<(), StoreError> {
        self.backend.set(IDENTITY_KEY, identity)?;
        self.backend.set(LOGGED_IN_KEY, LOGGED_IN_FLAG)?;
        Ok(())
    }
}
