//! Token storage backends.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::application::session::{TokenStore, TokenStoreError};
use crate::util::lock::mutex_lock;

const SOURCE: &str = "infra::session_store";

/// Token persisted to a single file, the on-disk equivalent of browser local
/// storage. Writes go through a temporary file in the same directory and are
/// renamed into place.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(TokenStoreError::io(err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(TokenStoreError::io)?;

        let mut file = NamedTempFile::new_in(&dir).map_err(TokenStoreError::io)?;
        file.write_all(token.as_bytes())
            .map_err(TokenStoreError::io)?;
        file.persist(&self.path)
            .map_err(|err| TokenStoreError::io(err.error))?;

        debug!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TokenStoreError::io(err)),
        }
    }
}

/// Process-local store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(mutex_lock(&self.token, SOURCE, "load").clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *mutex_lock(&self.token, SOURCE, "save") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        mutex_lock(&self.token, SOURCE, "clear").take();
        Ok(())
    }
}
