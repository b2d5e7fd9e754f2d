//! Session store.
//!
//! Holds the current `{token, user}` pair in memory and mirrors it to durable storage so a
//! restarted front end comes back logged in.
//!
//! ## Storage layout
//!
//! Two keys, both required together:
//!
//! ```text
//! <state_dir>/
//!   token    # bearer token, plain text
//!   user     # JSON-encoded `User`
//! ```
//!
//! Absence of either key, or a `user` that no longer decodes, reads as logged out. There is no
//! expiry timer: an expired token is noticed when the backend answers `401`, at which point the
//! API client calls [`SessionStore::logout`].

use crate::constants::{TOKEN_KEY, USER_KEY};
use crate::error::{ReportError, ReportResult};
use api_shared::{Role, User};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

// ============================================================================
// STORAGE ADAPTERS
// ============================================================================

/// Durable key/value storage backing the session.
pub trait SessionStorage: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> ReportResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> ReportResult<()>;

    /// Removes the key. Removing an absent key is not an error.
    fn clear(&self, key: &str) -> ReportResult<()>;
}

/// File-backed storage: one file per key under a state directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> ReportResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReportError::StorageRead(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> ReportResult<()> {
        fs::create_dir_all(&self.dir).map_err(ReportError::StorageWrite)?;
        fs::write(self.path_for(key), value).map_err(ReportError::StorageWrite)
    }

    fn clear(&self, key: &str) -> ReportResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReportError::StorageWrite(e)),
        }
    }
}

/// In-memory storage, for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ReportResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ReportResult<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> ReportResult<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

// ============================================================================
// SESSION STORE
// ============================================================================

/// An authenticated session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }
}

struct Inner {
    storage: Box<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
}

/// Session context shared by the API client and every view.
///
/// Cloning is cheap and every clone observes the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl SessionStore {
    /// Creates a store and rehydrates it from `storage`.
    ///
    /// Storage read failures are logged and leave the store logged out.
    pub fn load(storage: impl SessionStorage + 'static) -> Self {
        let current = match rehydrate(&storage) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("failed to read stored session, starting logged out: {}", e);
                None
            }
        };

        if let Some(session) = &current {
            tracing::debug!(user = %session.user.email, "rehydrated stored session");
        }

        Self {
            inner: Arc::new(Inner {
                storage: Box::new(storage),
                current: RwLock::new(current),
            }),
        }
    }

    /// Current session, if logged in.
    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stores a new session in durable storage and then in memory.
    ///
    /// Both keys are written or neither is: if the `user` write fails the freshly written
    /// `token` is removed again and the in-memory session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Serialization` if the user cannot be encoded, or a storage error if
    /// either write fails.
    pub fn login(&self, token: String, user: User) -> ReportResult<()> {
        let user_json = serde_json::to_string(&user).map_err(ReportError::Serialization)?;

        self.inner.storage.set(TOKEN_KEY, &token)?;
        if let Err(e) = self.inner.storage.set(USER_KEY, &user_json) {
            if let Err(cleanup) = self.inner.storage.clear(TOKEN_KEY) {
                tracing::warn!("failed to roll back stored token: {}", cleanup);
            }
            return Err(e);
        }

        tracing::info!(user = %user.email, role = %user.role, "session started");
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Session { token, user });
        Ok(())
    }

    /// Clears the session in memory and in durable storage.
    ///
    /// The in-memory session is always cleared; storage errors are reported after both keys
    /// have been attempted.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn logout(&self) -> ReportResult<()> {
        let previous = self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            tracing::info!(user = %session.user.email, "session cleared");
        }

        let token_result = self.inner.storage.clear(TOKEN_KEY);
        let user_result = self.inner.storage.clear(USER_KEY);
        token_result.and(user_result)
    }
}

fn rehydrate(storage: &dyn SessionStorage) -> ReportResult<Option<Session>> {
    let (Some(token), Some(user_json)) = (storage.get(TOKEN_KEY)?, storage.get(USER_KEY)?) else {
        return Ok(None);
    };
    if token.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<User>(&user_json) {
        Ok(user) => Ok(Some(Session { token, user })),
        Err(e) => {
            tracing::warn!("stored user does not decode, ignoring session: {}", e);
            Ok(None)
        }
    }
}
