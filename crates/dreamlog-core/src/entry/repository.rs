//! Entry repository trait.
//!
//! Defines the interface for journal-entry persistence operations.

use super::model::JournalEntry;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing journal-entry persistence.
///
/// This trait defines the contract shared by the on-device JSON file store
/// and the remote document store, decoupling the application's core logic
/// from the specific storage mechanism. The backend in use is chosen at
/// composition time by injecting the matching implementation.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Owner partitioning (a user only ever sees entries with their owner id)
/// - Idempotent deletion (deleting an absent id is not an error)
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Persists a new entry.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Entry stored
    /// - `Err(_)`: Storage rejected the write (I/O, network, validation)
    async fn add(&self, entry: &JournalEntry) -> Result<()>;

    /// Overwrites a stored entry by id.
    ///
    /// Requires `entry.id` to be present; an empty id fails loud rather
    /// than silently creating a record.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Entry overwritten
    /// - `Err(_)`: Missing id, unknown entry, or storage failure
    async fn update(&self, entry: &JournalEntry) -> Result<()>;

    /// Fetches all entries belonging to `owner_id`, in the backend's
    /// presentation order.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<JournalEntry>)`: The owner's entries (possibly empty)
    /// - `Err(_)`: Storage failure; an empty store is not an error
    async fn fetch_by_owner(&self, owner_id: &str) -> Result<Vec<JournalEntry>>;

    /// Removes an entry by id, irreversibly.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Entry removed (or was already absent)
    /// - `Err(_)`: Storage failure
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}
