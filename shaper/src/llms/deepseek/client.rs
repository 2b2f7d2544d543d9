//! DeepSeek API client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::{Error, Result};
use crate::llms::error::LlmError;
use crate::message::Message;

use super::config::DeepSeekConfig;
use super::types::{WireChatRequest, WireChatResponse, WireErrorResponse, WireMessage};

const PROVIDER: &str = "deepseek";

/// DeepSeek API client.
///
/// Speaks the OpenAI-compatible Chat Completions protocol, so any endpoint
/// implementing it can be targeted through [`DeepSeekConfig::with_base_url`].
#[derive(Debug, Clone)]
pub struct DeepSeek {
    pub(crate) config: Arc<DeepSeekConfig>,
    pub(crate) client: Client,
}

impl DeepSeek {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the API key is empty or the HTTP
    /// client cannot be built.
    pub fn new(config: DeepSeekConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::configuration("DeepSeek API key is required"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `DEEPSEEK_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(DeepSeekConfig::from_env()?)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the chat completions URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn convert_message(msg: &Message) -> WireMessage {
        WireMessage {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }

    /// Build the request body.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> WireChatRequest {
        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        WireChatRequest {
            model,
            messages: request.messages.iter().map(Self::convert_message).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    /// Parse an error response.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<WireErrorResponse>(body) {
            let error = error_response.error;

            return match status {
                401 | 403 => LlmError::auth(PROVIDER, error.message),
                429 => LlmError::rate_limited(PROVIDER),
                _ => {
                    let code = error
                        .code
                        .or(error.error_type)
                        .unwrap_or_else(|| status.to_string());
                    LlmError::provider_code(PROVIDER, code, error.message)
                }
            };
        }

        match status {
            401 | 403 => LlmError::auth(PROVIDER, body.to_owned()),
            429 => LlmError::rate_limited(PROVIDER),
            _ => LlmError::http_status(status, body.to_owned()),
        }
    }

    /// Parse the response body into a [`ChatResponse`].
    pub(crate) fn parse_response(response: WireChatResponse) -> std::result::Result<ChatResponse, LlmError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one choice", "empty choices"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::response_format("message content", "null content"))?;

        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            "received completion"
        );

        let mut parsed = ChatResponse::from_text(content);
        parsed.model = response.model;
        parsed.id = response.id;
        Ok(parsed)
    }
}

#[async_trait]
impl ChatProvider for DeepSeek {
    async fn chat(&self, request: &ChatRequest) -> std::result::Result<ChatResponse, LlmError> {
        let url = self.chat_url();
        let body = self.build_body(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        let response_text = response.text().await?;
        let parsed: WireChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid chat completion response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Self::parse_response(parsed)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn default_model(&self) -> &str {
        self.model()
    }
}
