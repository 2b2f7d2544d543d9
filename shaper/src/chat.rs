//! Chat types and the model client capability.
//!
//! This module provides:
//! - [`ChatRequest`]: parameters for one chat completion
//! - [`ChatResponse`]: the reply of that completion
//! - [`ChatProvider`]: the trait every model client implements
//!
//! # Example
//!
//! ```rust,ignore
//! use shaper::prelude::*;
//!
//! let request = ChatRequest::new("deepseek-chat")
//!     .user("Summarise this paragraph ...")
//!     .temperature(0.7);
//!
//! let response = provider.chat(&request).await?;
//! println!("{}", response.text());
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llms::error::LlmError;
use crate::message::Message;

/// A chat completion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier. Empty means "the provider's default model".
    pub model: String,

    /// Conversation messages, in order.
    pub messages: Vec<Message>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates an empty request for the given model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Appends a system message.
    #[must_use]
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Appends a user message.
    #[must_use]
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of generated tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A chat completion response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated assistant message.
    pub message: Message,

    /// Model identifier reported by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Provider-assigned completion id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ChatResponse {
    /// Creates a response from assistant text.
    #[must_use]
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(content),
            model: None,
            id: None,
        }
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the completion id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the reply text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.message.content
    }

    /// Consumes the response and returns the reply text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.message.content
    }
}

/// The language model client capability.
///
/// One call is one request/response round trip. Implementations own their
/// transport, authentication and any timeout; the pipeline adds no retry.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat completion request and receive the complete response.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Name of this provider, used in errors and logs.
    fn provider_name(&self) -> &'static str;

    /// Model used when a request leaves [`ChatRequest::model`] empty.
    fn default_model(&self) -> &str;
}

/// Type alias for an Arc-wrapped [`ChatProvider`].
pub type SharedChatProvider = std::sync::Arc<dyn ChatProvider>;
