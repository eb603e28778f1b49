//! JSON-file-backed ProfileRepository implementation.
//!
//! Profiles live in their own file, separate from journal entries, with the
//! same full-rewrite-per-mutation model.

use async_trait::async_trait;
use dreamlog_core::user::{ProfileRepository, UserProfile};
use dreamlog_core::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::DreamlogPaths;

/// Stores user profile records in a single JSON file.
pub struct JsonFileProfileRepository {
    file_path: PathBuf,
}

impl JsonFileProfileRepository {
    /// Creates a repository backed by the given file.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { file_path })
    }

    /// Creates a repository at the default location
    /// (`<config dir>/dreamlog/profiles.json`).
    pub fn default_location() -> Result<Self> {
        Self::new(DreamlogPaths::profiles_file()?)
    }

    fn read_all(&self) -> Result<Vec<UserProfile>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file_path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, profiles: &[UserProfile]) -> Result<()> {
        let json = serde_json::to_string_pretty(profiles)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for JsonFileProfileRepository {
    async fn save(&self, profile: &UserProfile) -> Result<()> {
        let mut profiles = self.read_all()?;
        match profiles.iter_mut().find(|stored| stored.id == profile.id) {
            Some(slot) => *slot = profile.clone(),
            None => profiles.push(profile.clone()),
        }
        self.write_all(&profiles)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        Ok(self.read_all()?.into_iter().find(|p| p.id == id))
    }

    async fn fetch_all(&self) -> Result<Vec<UserProfile>> {
        self.read_all()
    }
}
