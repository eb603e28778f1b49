//! Secret and application configuration types.
//!
//! Secrets live in `secret.json` under the app config directory and are
//! loaded through [`crate::secret::SecretService`]; nothing in this crate
//! embeds credentials in code.

use serde::{Deserialize, Serialize};

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Interpretation (LLM) API credentials
    #[serde(default)]
    pub interpreter: Option<InterpreterConfig>,
    /// Identity provider credentials
    #[serde(default)]
    pub identity: Option<IdentityConfig>,
}

/// Interpretation API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    pub api_key: String,
    /// Overrides the default completion model when set
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Identity provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Provider project/API key sent with every identity request
    pub api_key: String,
}

/// Remote document store endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteStoreConfig {
    /// Base URL of the document collection API
    pub base_url: String,
    /// Seconds between live-query polls
    #[serde(default = "default_poll_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_secs() -> u64 {
    5
}

/// Root structure of `config.toml`.
///
/// Everything here is optional; a missing config file means on-device
/// storage only, with all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote document store endpoint; absent means local storage only
    #[serde(default)]
    pub remote: Option<RemoteStoreConfig>,
    /// Base URL of the identity provider
    #[serde(default)]
    pub identity_base_url: Option<String>,
}
