//! Session/auth gate contract.
//!
//! The identity provider itself is an external collaborator; this module only
//! defines the session shape and the trait the rest of the system keys its
//! queries on.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The authenticated session established by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Identifier the stores partition their queries on
    pub user_id: String,
    /// Email the user signed in with
    pub email: String,
    /// Bearer token presented to the remote store
    pub id_token: String,
}

/// Gate over a third-party identity provider.
///
/// Exposes sign-in/sign-up/sign-out plus the authenticated/not-authenticated
/// observable pair the storage layer reads to scope all queries. Password
/// reset is a thin pass-through to the provider.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Signs in with email and password, establishing the current session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Creates an account and establishes the current session.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<AuthSession>;

    /// Clears the current session.
    async fn sign_out(&self);

    /// Asks the provider to send a password-reset message.
    async fn request_password_reset(&self, email: &str) -> Result<()>;

    /// The current session, if signed in.
    fn session(&self) -> Option<AuthSession>;

    /// Whether a user is currently signed in.
    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Identifier of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String> {
        self.session().map(|s| s.user_id)
    }
}
