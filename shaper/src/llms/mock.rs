//! Mock chat provider for testing.
//!
//! Returns predefined replies (or errors) in sequence, cycling through them,
//! and records every request it receives so tests can assert on call counts
//! and rendered prompts without making real API calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::llms::error::LlmError;

/// A scripted chat provider.
///
/// # Example
///
/// ```rust,ignore
/// use shaper::llms::MockProvider;
///
/// let provider = MockProvider::new(["first reply", "second reply"]);
/// // First call returns "first reply", second "second reply", third "first reply" again...
/// ```
#[derive(Debug)]
pub struct MockProvider {
    model_id: String,
    replies: Vec<Result<String, LlmError>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a mock that answers with the given texts.
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(replies.into_iter().map(|r| Ok(r.into())))
    }

    /// Create a mock from a script mixing replies and failures.
    #[must_use]
    pub fn scripted(script: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            model_id: "mock-model".to_owned(),
            replies: script.into_iter().collect(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose every call fails with `error`.
    #[must_use]
    pub fn failing(error: LlmError) -> Self {
        Self::scripted([Err(error)])
    }

    /// Set a custom default model id.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Number of `chat` calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every request received so far.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if self.replies.is_empty() {
            return Err(LlmError::internal("mock provider has no scripted replies"));
        }

        self.replies[index % self.replies.len()]
            .clone()
            .map(|text| ChatResponse::from_text(text).with_model(self.model_id.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_cycles_replies() {
        let mock = MockProvider::new(["first", "second"]);
        let request = ChatRequest::new("m").user("hi");

        assert_eq!(mock.chat(&request).await.unwrap().text(), "first");
        assert_eq!(mock.chat(&request).await.unwrap().text(), "second");
        assert_eq!(mock.chat(&request).await.unwrap().text(), "first");
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let mock = MockProvider::failing(LlmError::rate_limited("mock"));
        let err = mock.chat(&ChatRequest::new("m")).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_records_last_request() {
        let mock = MockProvider::new(["ok"]);
        mock.chat(&ChatRequest::new("m").user("the prompt")).await.unwrap();
        let last = mock.last_request().await.unwrap();
        assert_eq!(last.messages[0].content, "the prompt");
    }

    #[test]
    fn test_mock_custom_id() {
        let mock = MockProvider::new(["x"]).with_model_id("custom-mock");
        assert_eq!(mock.default_model(), "custom-mock");
    }
}
