//! IdentityGateway - thin gateway over the identity provider's REST API.
//!
//! Authentication-SDK glue, not original logic: sign-in/sign-up/sign-out and
//! password reset pass through to the provider, and the resulting session is
//! held in memory for the storage layer to key its queries on.

use async_trait::async_trait;
use dreamlog_core::auth::{AuthService, AuthSession};
use dreamlog_core::secret::SecretService;
use dreamlog_core::{DreamlogError, Result};
use dreamlog_infrastructure::SecretServiceImpl;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::{Arc, RwLock};

/// Gateway holding the provider endpoint and the signed-in session.
pub struct IdentityGateway {
    client: Client,
    base_url: String,
    /// Provider project key sent with every request
    api_key: String,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl IdentityGateway {
    /// Creates a gateway for the provider at `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a gateway reading the provider key from the dreamlog secret
    /// file, falling back to `DREAMLOG_IDENTITY_API_KEY`.
    pub async fn try_from_env(base_url: impl Into<String>) -> Result<Self> {
        if let Ok(service) = SecretServiceImpl::default_location() {
            if let Ok(secrets) = service.load_secrets().await {
                if let Some(config) = secrets.identity {
                    return Ok(Self::new(base_url, config.api_key));
                }
            }
        }

        let api_key = env::var("DREAMLOG_IDENTITY_API_KEY").map_err(|_| {
            DreamlogError::config(
                "Identity API key not found in secret.json or DREAMLOG_IDENTITY_API_KEY",
            )
        })?;
        Ok(Self::new(base_url, api_key))
    }

    fn account_url(&self, action: &str) -> String {
        format!("{}/accounts/{}?key={}", self.base_url, action, self.api_key)
    }

    async fn post_account<B: Serialize>(&self, action: &str, body: &B) -> Result<SessionResponse> {
        let response = self
            .client
            .post(self.account_url(action))
            .json(body)
            .send()
            .await
            .map_err(|err| DreamlogError::auth(format!("identity request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_identity_error(status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|err| DreamlogError::auth(format!("failed to parse identity response: {err}")))
    }

    fn store_session(&self, session: AuthSession) {
        *self.session.write().unwrap() = Some(session);
    }
}

#[async_trait]
impl AuthService for IdentityGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = CredentialsRequest {
            email,
            password,
            username: None,
        };
        let response = self.post_account("sign_in", &body).await?;

        let session = response.into_session();
        self.store_session(session.clone());
        tracing::info!("user {} signed in", session.user_id);
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<AuthSession> {
        let body = CredentialsRequest {
            email,
            password,
            username,
        };
        let response = self.post_account("sign_up", &body).await?;

        let session = response.into_session();
        self.store_session(session.clone());
        tracing::info!("user {} signed up", session.user_id);
        Ok(session)
    }

    async fn sign_out(&self) {
        let mut session = self.session.write().unwrap();
        if let Some(old) = session.take() {
            tracing::info!("user {} signed out", old.user_id);
        }
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        let body = ResetRequest { email };
        let response = self
            .client
            .post(self.account_url("reset_password"))
            .json(&body)
            .send()
            .await
            .map_err(|err| DreamlogError::auth(format!("identity request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_identity_error(status, &body_text));
        }
        Ok(())
    }

    fn session(&self) -> Option<AuthSession> {
        self.session.read().unwrap().clone()
    }
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

#[derive(Serialize)]
struct ResetRequest<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    user_id: String,
    email: String,
    id_token: String,
}

impl SessionResponse {
    fn into_session(self) -> AuthSession {
        AuthSession {
            user_id: self.user_id,
            email: self.email,
            id_token: self.id_token,
        }
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

/// Surfaces the provider's human-readable message; it is displayed to the
/// user as-is.
fn map_identity_error(status: StatusCode, body: &str) -> DreamlogError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| format!("identity provider returned {}", status.as_u16()));

    DreamlogError::auth(message)
}
