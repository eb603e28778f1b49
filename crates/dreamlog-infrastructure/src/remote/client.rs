//! REST client for the remote entry collection.
//!
//! Speaks a small document-store API: a per-owner query endpoint plus
//! create/overwrite/delete by id. The server returns per-owner collections
//! already ordered by `created_at` descending; this client does no
//! re-sorting. Every request carries the signed-in session's bearer token.

use async_trait::async_trait;
use dreamlog_core::auth::AuthService;
use dreamlog_core::config::RemoteStoreConfig;
use dreamlog_core::entry::{EntryRepository, JournalEntry};
use dreamlog_core::{DreamlogError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;

/// Client for the remote journal-entry collection.
pub struct RemoteEntryClient {
    client: Client,
    base_url: String,
    auth: Arc<dyn AuthService>,
}

impl RemoteEntryClient {
    /// Creates a client for the collection at `base_url`.
    ///
    /// The bearer token is read from `auth` at request time, so a new
    /// sign-in is picked up without rebuilding the client.
    pub fn new(base_url: impl Into<String>, auth: Arc<dyn AuthService>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            auth,
        }
    }

    /// Creates a client from an endpoint configuration.
    pub fn from_config(config: &RemoteStoreConfig, auth: Arc<dyn AuthService>) -> Self {
        Self::new(config.base_url.clone(), auth)
    }

    fn owner_entries_url(&self, owner_id: &str) -> String {
        format!("{}/owners/{}/entries", self.base_url, owner_id)
    }

    fn entries_url(&self) -> String {
        format!("{}/entries", self.base_url)
    }

    fn entry_url(&self, id: &str) -> String {
        format!("{}/entries/{}", self.base_url, id)
    }

    /// Bearer token from the active session; every operation requires one.
    fn auth_token(&self) -> Result<String> {
        self.auth
            .session()
            .map(|session| session.id_token)
            .ok_or_else(|| DreamlogError::auth("No user is signed in"))
    }

    /// Checks the response status and maps failures to typed errors.
    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        Err(map_http_error(status, &body))
    }
}

#[async_trait]
impl EntryRepository for RemoteEntryClient {
    async fn add(&self, entry: &JournalEntry) -> Result<()> {
        let token = self.auth_token()?;
        let response = self
            .client
            .post(self.entries_url())
            .bearer_auth(token)
            .json(entry)
            .send()
            .await
            .map_err(|e| DreamlogError::remote(format!("create request failed: {e}")))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, entry: &JournalEntry) -> Result<()> {
        if entry.id.is_empty() {
            return Err(DreamlogError::invalid_input(
                "cannot update an entry without an id",
            ));
        }

        let token = self.auth_token()?;
        let response = self
            .client
            .put(self.entry_url(&entry.id))
            .bearer_auth(token)
            .json(entry)
            .send()
            .await
            .map_err(|e| DreamlogError::remote(format!("overwrite request failed: {e}")))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_by_owner(&self, owner_id: &str) -> Result<Vec<JournalEntry>> {
        let token = self.auth_token()?;
        let response = self
            .client
            .get(self.owner_entries_url(owner_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DreamlogError::remote(format!("query request failed: {e}")))?;

        let response = Self::ensure_success(response).await?;
        let entries: Vec<JournalEntry> = response
            .json()
            .await
            .map_err(|e| DreamlogError::remote(format!("failed to decode entry collection: {e}")))?;

        // Delivered in server order (created_at descending).
        Ok(entries)
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let token = self.auth_token()?;
        let response = self
            .client
            .delete(self.entry_url(id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DreamlogError::remote(format!("delete request failed: {e}")))?;

        // The server answers 404 for an already-deleted id; deletion is
        // idempotent from the caller's side.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[allow(dead_code)]
    code: Option<String>,
}

/// Maps a non-success response to a typed error, preferring the server's
/// structured error message when the body has one.
fn map_http_error(status: StatusCode, body: &str) -> DreamlogError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    DreamlogError::remote_status(status.as_u16(), message)
}
