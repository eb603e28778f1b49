//! Secret service implementation.
//!
//! Loads API keys from `secret.json` in the dreamlog config directory and
//! caches them in memory. Credentials never appear in code; see
//! [`DreamlogPaths::secret_file`] for the expected location.

use dreamlog_core::config::SecretConfig;
use dreamlog_core::secret::SecretService;
use dreamlog_core::{DreamlogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::paths::DreamlogPaths;

/// Service for managing secret configuration.
///
/// Reads `secret.json` once and caches the parsed result to avoid repeated
/// file I/O.
#[derive(Clone)]
pub struct SecretServiceImpl {
    file_path: PathBuf,
    /// Cached secret config loaded from storage.
    /// Uses RwLock for thread-safe lazy loading.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service reading from the default secret file location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(DreamlogPaths::secret_file()?))
    }

    /// Creates a service reading from an explicit path.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_internal(&self) -> Result<SecretConfig> {
        {
            let read_lock = self.secrets.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        if !self.file_path.exists() {
            return Err(DreamlogError::config(format!(
                "Secret file not found at: {}",
                self.file_path.display()
            )));
        }

        let content = fs::read_to_string(&self.file_path)?;
        let loaded: SecretConfig = serde_json::from_str(&content)?;

        {
            let mut write_lock = self.secrets.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.file_path.exists()
    }
}
