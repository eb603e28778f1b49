//! Configuration service implementation.
//!
//! Loads the optional app configuration from `config.toml` in the dreamlog
//! config directory and caches it. A missing file is the normal case and
//! yields the default configuration (on-device storage only).

use dreamlog_core::Result;
use dreamlog_core::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::paths::DreamlogPaths;

/// Configuration service that loads and caches the app configuration.
///
/// Reads `config.toml` once and caches the parsed result to avoid repeated
/// file I/O.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file_path: PathBuf,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a service reading from the default config file location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(DreamlogPaths::config_file()?))
    }

    /// Creates a service reading from an explicit path.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the app configuration, loading from file if not cached.
    ///
    /// A missing file yields `AppConfig::default()`; a present-but-invalid
    /// file is a typed error, not a silent fallback.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<AppConfig> {
        if !self.file_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.file_path)?;
        Ok(toml::from_str(&content)?)
    }
}
