//! DreamInterpreter - chat-completion client producing dream interpretations.
//!
//! One HTTPS POST per call, no retries, no caching, platform-default timeout.
//! Configuration priority: secret.json in the dreamlog config dir > environment
//! variables. The entry text is interpolated into the prompt verbatim; the
//! response is opaque prose and is returned untouched apart from trimming.

use async_trait::async_trait;
use dreamlog_core::secret::SecretService;
use dreamlog_core::{DreamlogError, Result};
use dreamlog_infrastructure::SecretServiceImpl;
use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Shown in place of an interpretation when the API call fails.
pub const FALLBACK_INTERPRETATION: &str =
    "Unable to interpret dream at this time. Please try again later.";

/// Fixed prompt; the entry text is embedded verbatim, unsanitized.
const PROMPT_TEMPLATE: &str = "\
You are a thoughtful dream interpreter. A person recorded the following dream \
in their journal. Offer a short interpretation of what the dream might mean, \
followed by one piece of gentle guidance. Do not diagnose or alarm.

Dream:
{{ dream_text }}";

static PROMPT_ENV: Lazy<Environment<'static>> = Lazy::new(Environment::new);

/// Produces a free-text interpretation for a journal entry.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Interprets `entry_text`, returning the provider's prose verbatim
    /// (surrounding whitespace trimmed).
    async fn interpret(&self, entry_text: &str) -> Result<String>;
}

/// Client for the chat-completion interpretation endpoint.
#[derive(Clone)]
pub struct DreamInterpreter {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl DreamInterpreter {
    /// Creates a client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Loads configuration from the dreamlog secret file or environment
    /// variables.
    ///
    /// Priority:
    /// 1. `secret.json` (`interpreter.api_key`, `interpreter.model_name`)
    /// 2. Environment variables (`DREAMLOG_INTERPRETER_API_KEY`,
    ///    `DREAMLOG_INTERPRETER_MODEL`)
    ///
    /// Model name defaults to `gpt-4o-mini` if not specified.
    pub async fn try_from_env() -> Result<Self> {
        if let Ok(service) = SecretServiceImpl::default_location() {
            if let Ok(secrets) = service.load_secrets().await {
                if let Some(config) = secrets.interpreter {
                    let model = config.model_name.unwrap_or_else(|| DEFAULT_MODEL.into());
                    return Ok(Self::new(config.api_key, model));
                }
            }
        }

        let api_key = env::var("DREAMLOG_INTERPRETER_API_KEY").map_err(|_| {
            DreamlogError::config(
                "Interpreter API key not found in secret.json or DREAMLOG_INTERPRETER_API_KEY",
            )
        })?;

        let model =
            env::var("DREAMLOG_INTERPRETER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                DreamlogError::interpretation(format!("interpretation request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            DreamlogError::interpretation(format!("failed to parse interpretation response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Interpreter for DreamInterpreter {
    async fn interpret(&self, entry_text: &str) -> Result<String> {
        let prompt = render_prompt(entry_text)?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        self.send_request(&request).await
    }
}

/// Renders the fixed prompt with the entry text embedded verbatim.
fn render_prompt(entry_text: &str) -> Result<String> {
    PROMPT_ENV
        .render_str(PROMPT_TEMPLATE, context! { dream_text => entry_text })
        .map_err(|err| DreamlogError::internal(format!("prompt rendering failed: {err}")))
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
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

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            DreamlogError::interpretation("interpretation response contained no content")
        })
}

fn map_http_error(status: StatusCode, body: &str) -> DreamlogError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    DreamlogError::interpretation(format!("provider returned {}: {}", status.as_u16(), message))
}
