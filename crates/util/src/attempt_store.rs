//! Persistence for a payment attempt that spans a redirect to the external checkout.
//!
//! At most one attempt is stored at a time. The JSON-backed store mirrors the
//! preferences file ergonomics (env override, tilde expansion, config
//! directory fallback); an unreadable file is treated as "no attempt".

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use regdesk_types::PersistedAttempt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::path_processing::{expand_tilde, path_from_env_or_config_dir};

/// Environment variable controlling the attempt file location.
pub const ATTEMPT_PATH_ENV: &str = "REGDESK_ATTEMPT_PATH";

/// Default filename for the persisted attempt.
pub const ATTEMPT_FILE_NAME: &str = "pending_attempt.json";

#[derive(Debug, Error)]
pub enum AttemptStoreError {
    #[error("attempt store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("attempt store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage backend for the in-progress payment attempt.
pub trait AttemptStore: Send + Sync {
    fn load(&self) -> Result<Option<PersistedAttempt>, AttemptStoreError>;

    /// Replace any stored attempt.
    fn save(&self, attempt: &PersistedAttempt) -> Result<(), AttemptStoreError>;

    /// Remove the stored attempt; succeeds when nothing is stored.
    fn clear(&self) -> Result<(), AttemptStoreError>;
}

pub struct JsonAttemptStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonAttemptStore {
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Self {
        let path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => path_from_env_or_config_dir(ATTEMPT_PATH_ENV, ATTEMPT_FILE_NAME),
        };
        Self { path, lock: Mutex::new(()) }
    }

    pub fn with_defaults() -> Self {
        Self::new(None::<PathBuf>)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttemptStore for JsonAttemptStore {
    fn load(&self) -> Result<Option<PersistedAttempt>, AttemptStoreError> {
        let _guard = self.lock.lock().expect("attempt store lock poisoned");
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<PersistedAttempt>(&content) {
                Ok(attempt) => Ok(Some(attempt)),
                Err(error) => {
                    warn!("Failed to parse attempt file at {}: {}", self.path.display(), error);
                    Ok(None)
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AttemptStoreError::Io(error)),
        }
    }

    fn save(&self, attempt: &PersistedAttempt) -> Result<(), AttemptStoreError> {
        let _guard = self.lock.lock().expect("attempt store lock poisoned");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(attempt)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), attempted_at = %attempt.attempted_at, "persisted payment attempt");
        Ok(())
    }

    fn clear(&self) -> Result<(), AttemptStoreError> {
        let _guard = self.lock.lock().expect("attempt store lock poisoned");
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared payment attempt");
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AttemptStoreError::Io(error)),
        }
    }
}

/// In-memory store primarily used for unit testing.
#[derive(Default)]
pub struct InMemoryAttemptStore {
    attempt: Mutex<Option<PersistedAttempt>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attempt(attempt: PersistedAttempt) -> Self {
        Self {
            attempt: Mutex::new(Some(attempt)),
        }
    }
}

impl AttemptStore for InMemoryAttemptStore {
    fn load(&self) -> Result<Option<PersistedAttempt>, AttemptStoreError> {
        Ok(self.attempt.lock().expect("attempt store lock poisoned").clone())
    }

    fn save(&self, attempt: &PersistedAttempt) -> Result<(), AttemptStoreError> {
        *self.attempt.lock().expect("attempt store lock poisoned") = Some(attempt.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AttemptStoreError> {
        self.attempt.lock().expect("attempt store lock poisoned").take();
        Ok(())
    }
}
