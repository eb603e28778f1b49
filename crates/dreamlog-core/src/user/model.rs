//! User profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally stored user profile record.
///
/// Profiles live in their own file, separate from journal entries, and are
/// keyed by the identity provider's user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider user id
    pub id: String,
    pub email: String,
    /// Display name shown in the app
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}
