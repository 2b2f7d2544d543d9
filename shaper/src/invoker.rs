//! Model invocation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::{ChatRequest, SharedChatProvider};
use crate::error::Result;

/// Per-task model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model id; `None` uses the provider's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on generated tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

impl ModelSettings {
    /// Settings with the given temperature and the provider's default model.
    #[must_use]
    pub const fn with_temperature(temperature: f32) -> Self {
        Self {
            model: None,
            temperature,
            max_tokens: None,
        }
    }

    /// Sets the model id.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the token cap.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Sends rendered prompts to a chat provider.
///
/// One call per [`invoke`](Self::invoke), no retry.
#[derive(Clone)]
pub struct ModelInvoker {
    provider: SharedChatProvider,
    settings: ModelSettings,
}

impl std::fmt::Debug for ModelInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInvoker")
            .field("provider", &self.provider.provider_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ModelInvoker {
    /// Creates an invoker.
    #[must_use]
    pub fn new(provider: SharedChatProvider, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }

    /// Model settings.
    #[must_use]
    pub const fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Model id the next call will use.
    #[must_use]
    pub fn model(&self) -> &str {
        self.settings
            .model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Builds the request for `prompt`.
    #[must_use]
    pub fn request(&self, prompt: &str) -> ChatRequest {
        let mut request = ChatRequest::new(self.model())
            .user(prompt)
            .temperature(self.settings.temperature);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.max_tokens(max_tokens);
        }
        request
    }

    /// Sends `prompt` and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`](crate::error::Error::Upstream) for any
    /// provider failure.
    pub async fn invoke(&self, prompt: &str) -> Result<String> {
        let request = self.request(prompt);
        debug!(
            provider = self.provider.provider_name(),
            model = %request.model,
            temperature = self.settings.temperature,
            "invoking model"
        );

        let response = self.provider.chat(&request).await?;
        debug!(
            reply_len = response.text().len(),
            model = response.model.as_deref().unwrap_or(&request.model),
            "reply received"
        );
        Ok(response.into_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::clone_on_ref_ptr)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::{Error, LlmError};
    use crate::llms::MockProvider;

    #[tokio::test]
    async fn invoke_sends_one_user_message() {
        let mock = Arc::new(MockProvider::new(["reply"]));
        let invoker = ModelInvoker::new(mock.clone(), ModelSettings::with_temperature(0.7));

        assert_eq!(invoker.invoke("the prompt").await.unwrap(), "reply");
        assert_eq!(mock.call_count(), 1);

        let request = mock.last_request().await.unwrap();
        assert_eq!(request.model, "mock-model");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "the prompt");
    }

    #[tokio::test]
    async fn model_override_and_token_cap() {
        let mock = Arc::new(MockProvider::new(["ok"]));
        let settings = ModelSettings::default().model("deepseek-reasoner").max_tokens(64);
        let invoker = ModelInvoker::new(mock.clone(), settings);

        invoker.invoke("p").await.unwrap();
        let request = mock.last_request().await.unwrap();
        assert_eq!(request.model, "deepseek-reasoner");
        assert_eq!(request.max_tokens, Some(64));
    }

    #[tokio::test]
    async fn provider_failure_is_upstream() {
        let mock = Arc::new(MockProvider::failing(LlmError::network("connection refused")));
        let invoker = ModelInvoker::new(mock, ModelSettings::default());

        let err = invoker.invoke("p").await.unwrap_err();
        assert!(matches!(err, Error::Upstream(LlmError::Network(_))));
    }
}
