//! User profile repository trait.

use super::model::UserProfile;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence contract for user profile records.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Inserts or replaces the profile with the same id.
    async fn save(&self, profile: &UserProfile) -> Result<()>;

    /// Finds a profile by user id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UserProfile))`: Profile found
    /// - `Ok(None)`: No profile stored for this id
    /// - `Err(_)`: Storage failure
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>>;

    /// Lists all stored profiles.
    async fn fetch_all(&self) -> Result<Vec<UserProfile>>;
}
