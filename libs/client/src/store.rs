//! Token storage with expiry mirroring and capability probing.
//!
//! Persistent storage may be unavailable (read-only home directory, private
//! browsing in the WASM build), so every operation first probes the backing
//! store with a sentinel key and degrades to `None`/`false` instead of
//! failing the caller.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

const TOKEN_KEY: &str = "auth_token";
const EXPIRES_KEY: &str = "auth_token_expires";
const REMEMBER_KEY: &str = "auth_token_remember";
const STATUS_KEY: &str = "is_authenticated";
const USER_KEY: &str = "user";
const PROBE_KEY: &str = "__storage_probe__";

/// Errors raised by a backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage is not writable")]
    ReadOnly,
}

/// A minimal string key-value store, the shape `localStorage` gives us.
pub trait KeyValueStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used in tests and for throwaway sessions.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            writable: true,
        }
    }

    /// A store whose writes fail, for exercising the degraded path.
    pub fn read_only() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            writable: false,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.writable {
            return Err(StoreError::ReadOnly);
        }
        let mut entries = self.entries.lock().map_err(|_| StoreError::ReadOnly)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::ReadOnly)?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if !self.writable {
            return Err(StoreError::ReadOnly);
        }
        let mut entries = self.entries.lock().map_err(|_| StoreError::ReadOnly)?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON object per session file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.remove(key);
        self.persist(&entries)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Session-scoped wrapper over a [`KeyValueStore`].
///
/// Holds the bearer token, its mirrored expiry, the "remember me" flag, an
/// authentication boolean, and the cached user profile. `auth_token` clears
/// the whole session the moment the mirrored expiry has passed, so a stale
/// token is never handed to the network layer.
pub struct SessionStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Write/read/remove a sentinel key to confirm the store works.
    pub fn is_available(&self) -> bool {
        self.backend.set(PROBE_KEY, PROBE_KEY).is_ok()
            && self.backend.get(PROBE_KEY).is_ok()
            && self.backend.remove(PROBE_KEY).is_ok()
    }

    /// Store the token with its server-supplied expiry (unix millis).
    ///
    /// Returns `true` only when the token reads back identical to what was
    /// written, which is what lets the login flow verify the commit.
    pub fn set_token(&self, token: &str, expires_at_millis: i64, remember: bool) -> bool {
        if !self.is_available() {
            warn!("session storage is unavailable, token not persisted");
            return false;
        }

        let stored = self.backend.set(TOKEN_KEY, token).is_ok()
            && self
                .backend
                .set(EXPIRES_KEY, &expires_at_millis.to_string())
                .is_ok()
            && self
                .backend
                .set(REMEMBER_KEY, &remember.to_string())
                .is_ok();

        stored && self.backend.get(TOKEN_KEY).ok().flatten().as_deref() == Some(token)
    }

    /// The stored token, or `None` once the mirrored expiry has passed.
    pub fn auth_token(&self) -> Option<String> {
        if !self.is_available() {
            return None;
        }

        let token = self.backend.get(TOKEN_KEY).ok().flatten()?;
        let expires: i64 = self.backend.get(EXPIRES_KEY).ok().flatten()?.parse().ok()?;

        if now_millis() > expires {
            self.clear();
            return None;
        }

        Some(token)
    }

    pub fn remember_me(&self) -> bool {
        self.backend
            .get(REMEMBER_KEY)
            .ok()
            .flatten()
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    pub fn set_authenticated(&self, status: bool) -> bool {
        self.is_available() && self.backend.set(STATUS_KEY, &status.to_string()).is_ok()
    }

    pub fn is_authenticated(&self) -> bool {
        self.backend
            .get(STATUS_KEY)
            .ok()
            .flatten()
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    pub fn set_user(&self, user: &Value) -> bool {
        self.is_available() && self.backend.set(USER_KEY, &user.to_string()).is_ok()
    }

    pub fn user(&self) -> Option<Value> {
        let raw = self.backend.get(USER_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Remove every session key. Failures are ignored, the goal is cleanup.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, EXPIRES_KEY, REMEMBER_KEY, STATUS_KEY, USER_KEY] {
            let _ = self.backend.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> SessionStore<MemoryStore> {
        SessionStore::new(MemoryStore::new())
    }

    #[test]
    fn token_round_trips_before_expiry() {
        let store = session();
        assert!(store.set_token("tok-1", now_millis() + 60_000, false));
        assert_eq!(store.auth_token().as_deref(), Some("tok-1"));
        assert!(!store.remember_me());
    }

    #[test]
    fn expired_token_self_invalidates_and_clears_everything() {
        let store = session();
        assert!(store.set_token("tok-1", now_millis() - 1, true));
        store.set_authenticated(true);
        store.set_user(&json!({"username": "maya"}));

        assert_eq!(store.auth_token(), None);
        // The whole session must be gone, not just the token.
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
        assert!(!store.remember_me());
    }

    #[test]
    fn unavailable_store_degrades_instead_of_failing() {
        let store = SessionStore::new(MemoryStore::read_only());
        assert!(!store.is_available());
        assert!(!store.set_token("tok-1", now_millis() + 60_000, false));
        assert_eq!(store.auth_token(), None);
        assert!(!store.set_authenticated(true));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let store = SessionStore::new(FileStore::new(&path));
        assert!(store.set_token("tok-file", now_millis() + 60_000, true));
        assert!(store.set_user(&json!({"username": "maya", "role": "admin"})));

        let reopened = SessionStore::new(FileStore::new(&path));
        assert_eq!(reopened.auth_token().as_deref(), Some("tok-file"));
        assert!(reopened.remember_me());
        assert_eq!(reopened.user().unwrap()["role"], "admin");
    }

    #[test]
    fn clear_removes_all_keys() {
        let store = session();
        store.set_token("tok-1", now_millis() + 60_000, false);
        store.set_authenticated(true);
        store.clear();
        assert_eq!(store.auth_token(), None);
        assert!(!store.is_authenticated());
    }
}
