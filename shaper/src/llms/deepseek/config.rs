//! DeepSeek client configuration and credential source.

use crate::error::{Error, Result};

/// Configuration for the DeepSeek client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepSeekConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// Default model to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl DeepSeekConfig {
    /// Default DeepSeek API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.deepseek.com/v1";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "deepseek-chat";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Environment variable holding the API key.
    pub const API_KEY_VAR: &'static str = "DEEPSEEK_API_KEY";
    /// Environment variable overriding the base URL.
    pub const BASE_URL_VAR: &'static str = "DEEPSEEK_BASE_URL";
    /// Environment variable overriding the default model.
    pub const MODEL_VAR: &'static str = "DEEPSEEK_MODEL";

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `DEEPSEEK_API_KEY` - Required API key
    /// - `DEEPSEEK_BASE_URL` - Optional base URL
    /// - `DEEPSEEK_MODEL` - Optional default model
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the API key is missing or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the API key is missing or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(Self::API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "{} environment variable not set",
                    Self::API_KEY_VAR
                ))
            })?;

        let base_url = lookup(Self::BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());

        let model = lookup(Self::MODEL_VAR)
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_MODEL.to_owned());

        Ok(Self {
            api_key,
            base_url,
            model,
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}
