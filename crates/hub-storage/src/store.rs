//! Typed session operations over a [`SessionStorage`] backend.

use crate::{SessionStorage, StorageKeys, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Session token + cached user, written together and cleared together.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store over the given backend.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Raw session token, if any.
    pub fn get_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::SESSION_TOKEN)
    }

    /// Whether a session token is stored.
    pub fn has_session(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::SESSION_TOKEN)
    }

    /// Cached user. A stored value that does not parse is an
    /// [`Encoding`](crate::StorageError::Encoding) error.
    pub fn get_user<U: DeserializeOwned>(&self) -> StorageResult<Option<U>> {
        match self.storage.get(StorageKeys::USER)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Persist token and user as one unit.
    ///
    /// If the user cannot be written the token is removed again, so the store
    /// never holds a fresh token next to a missing user.
    pub fn set_session<U: Serialize>(&self, token: &str, user: &U) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)?;

        self.storage.set(StorageKeys::SESSION_TOKEN, token)?;
        if let Err(e) = self.storage.set(StorageKeys::USER, &user_json) {
            if let Err(rollback) = self.storage.remove(StorageKeys::SESSION_TOKEN) {
                tracing::warn!(
                    error = %rollback,
                    "Failed to roll back session token after user write failed"
                );
            }
            return Err(e);
        }

        tracing::debug!("Session persisted");
        Ok(())
    }

    /// Replace the cached user, leaving the token untouched.
    pub fn set_user<U: Serialize>(&self, user: &U) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(StorageKeys::USER, &user_json)
    }

    /// Remove token and user.
    ///
    /// Both removals are attempted even if the first fails; the first error
    /// is returned.
    pub fn clear_session(&self) -> StorageResult<()> {
        let token = self.storage.remove(StorageKeys::SESSION_TOKEN);
        let user = self.storage.remove(StorageKeys::USER);

        token?;
        user?;

        tracing::debug!("Session cleared");
        Ok(())
    }
}
