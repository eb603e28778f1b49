//! JSON-file-backed EntryRepository implementation.
//!
//! One file per device, holding a single JSON array of entries for all users.
//! Every mutation is a full read-modify-rewrite of the collection, which is
//! adequate for personal-journal entry counts (dozens to low hundreds).
//! There is no file locking; the store is effectively single-writer.

use async_trait::async_trait;
use dreamlog_core::entry::{EntryRepository, JournalEntry};
use dreamlog_core::{DreamlogError, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::DreamlogPaths;

/// A repository implementation storing journal entries in a single JSON file.
///
/// - A missing backing file is the expected first-run state: reads return an
///   empty collection, not an error.
/// - A present-but-unreadable file is a real failure and surfaces as a typed
///   error, so callers can tell "no data" from "fetch failed".
pub struct JsonFileEntryRepository {
    file_path: PathBuf,
}

impl JsonFileEntryRepository {
    /// Creates a repository backed by the given file.
    ///
    /// The parent directory is created if it doesn't exist; the file itself
    /// is only created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { file_path })
    }

    /// Creates a repository at the default location
    /// (`<config dir>/dreamlog/entries.json`).
    pub fn default_location() -> Result<Self> {
        Self::new(DreamlogPaths::entries_file()?)
    }

    /// Reads every entry on the device, across all owners, in file order.
    pub fn fetch_all(&self) -> Result<Vec<JournalEntry>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file_path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<JournalEntry> = serde_json::from_str(&content)?;
        Ok(entries)
    }

    /// Removes the backing file entirely. Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }

    /// Rewrites the whole collection.
    fn write_all(&self, entries: &[JournalEntry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.file_path, json).map_err(|e| {
            tracing::warn!(
                "failed to write entries file {:?}: {}",
                self.file_path,
                e
            );
            DreamlogError::from(e)
        })
    }
}

#[async_trait]
impl EntryRepository for JsonFileEntryRepository {
    async fn add(&self, entry: &JournalEntry) -> Result<()> {
        let mut entries = self.fetch_all()?;
        entries.push(entry.clone());
        self.write_all(&entries)
    }

    async fn update(&self, entry: &JournalEntry) -> Result<()> {
        if entry.id.is_empty() {
            return Err(DreamlogError::invalid_input(
                "cannot update an entry without an id",
            ));
        }

        let mut entries = self.fetch_all()?;
        let slot = entries
            .iter_mut()
            .find(|stored| stored.id == entry.id)
            .ok_or_else(|| DreamlogError::not_found("journal_entry", &entry.id))?;
        *slot = entry.clone();

        self.write_all(&entries)
    }

    async fn fetch_by_owner(&self, owner_id: &str) -> Result<Vec<JournalEntry>> {
        // O(n) scan; there is no index.
        Ok(self
            .fetch_all()?
            .into_iter()
            .filter(|entry| entry.owner_id == owner_id)
            .collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let mut entries = self.fetch_all()?;
        entries.retain(|entry| entry.id != id);
        self.write_all(&entries)
    }
}
