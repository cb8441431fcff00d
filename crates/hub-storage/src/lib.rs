//! Local persistence for the gamehub session.
//!
//! The session core never touches a concrete store; it talks to a
//! [`SessionStorage`] (`get`/`set`/`remove` over string keys). Two backends
//! ship here:
//! - [`MemoryStorage`] for tests and ephemeral hosts
//! - [`FileStorage`], a JSON object on disk, for the CLI
//!
//! [`SessionStore`] layers the typed session operations on top.

mod file;
mod keys;
mod memory;
mod store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use store::SessionStore;
pub use traits::SessionStorage;

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific failure
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Encoding(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open a file-backed session store at `path`.
pub fn open_file_store(path: &Path) -> StorageResult<SessionStore> {
    let storage = FileStorage::open(path)?;
    Ok(SessionStore::new(Arc::new(storage)))
}

/// Create an in-memory session store.
pub fn memory_store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStorage::new()))
}
