//! Error types for model client operations.
//!
//! [`LlmError`] covers every failure mode of a single chat-completion call
//! (authentication, rate limiting, transport, malformed provider responses).
//! The pipeline never retries; it converts these into
//! [`Error::Upstream`](crate::Error::Upstream) and absorbs them.

/// Error type for model client operations.
///
/// Each variant represents a distinct failure mode so callers and logs can
/// tell transient problems apart from permanent ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    /// Authentication or authorization failure.
    #[error("[{provider}] {message}")]
    Auth {
        /// Provider name (e.g., "deepseek").
        provider: String,
        /// Error description.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("[{provider}] Rate limit exceeded. Please retry after some time.")]
    RateLimited {
        /// Provider name.
        provider: String,
    },

    /// The provider answered, but not in the shape we expected.
    #[error("Expected {expected}, got {got}")]
    ResponseFormat {
        /// Expected format description.
        expected: String,
        /// Actual format received.
        got: String,
    },

    /// Network or connection error.
    #[error("{0}")]
    Network(String),

    /// HTTP status error without a structured error body.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider-specific error.
    #[error("[{provider}] {message}")]
    Provider {
        /// Provider name.
        provider: String,
        /// Error description.
        message: String,
        /// Optional error code from the provider.
        code: Option<String>,
    },

    /// Internal error.
    #[error("{0}")]
    Internal(String),
}

impl LlmError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ResponseFormat {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider error with an error code.
    #[must_use]
    pub fn provider_code(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a retryable error.
    ///
    /// Informational only: nothing in this crate retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::response_format("a readable response body", err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn body_decode_failure_is_response_format() {
        let response = reqwest::Response::from(http::Response::new("not json"));
        let err = response.json::<serde_json::Value>().await.unwrap_err();
        assert!(err.is_decode());

        let err = LlmError::from(err);
        assert!(matches!(err, LlmError::ResponseFormat { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn auth_display_includes_provider() {
        let err = LlmError::auth("deepseek", "Invalid API key");
        let s = err.to_string();
        assert!(s.contains("[deepseek]"));
        assert!(s.contains("Invalid API key"));
    }

    #[test]
    fn http_status_display() {
        let err = LlmError::http_status(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn retryable_classification() {
        assert!(LlmError::rate_limited("deepseek").is_retryable());
        assert!(LlmError::network("timeout").is_retryable());
        assert!(!LlmError::auth("deepseek", "bad key").is_retryable());
        assert!(!LlmError::internal("bug").is_retryable());
        assert!(!LlmError::http_status(500, "oops").is_retryable());
    }

    #[test]
    fn provider_code_keeps_code() {
        let err = LlmError::provider_code("deepseek", "invalid_request_error", "bad model");
        assert!(matches!(
            err,
            LlmError::Provider { ref code, .. } if code.as_deref() == Some("invalid_request_error")
        ));
    }
}
