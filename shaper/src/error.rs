//! Unified error types for shaper.
//!
//! The taxonomy splits into two groups:
//! - fatal errors that surface to the caller immediately
//!   ([`Error::Configuration`], [`Error::InvalidInput`], [`Error::Template`]);
//! - per-call errors that the pipeline absorbs into a fallback or unavailable
//!   outcome ([`Error::Upstream`], [`Error::SchemaValidation`],
//!   [`Error::MalformedReply`]).
//!
//! Every payload is an owned string so the error can travel inside an
//! [`Extraction`](crate::extraction::Extraction) as its error descriptor.

pub use crate::llms::error::LlmError;

/// Result type alias for shaper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for shaper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A credential or setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller supplied unusable input text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model client failed (transport, auth, rate limit, ...).
    #[error("Upstream error: {0}")]
    Upstream(#[from] LlmError),

    /// The reply parsed but violates a type or constraint rule.
    #[error("Schema validation failed for '{field}': {reason}")]
    SchemaValidation {
        /// Offending field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The reply could not be parsed at all.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    /// The prompt template could not be rendered.
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a schema validation error.
    #[must_use]
    pub fn schema_validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed reply error.
    #[must_use]
    pub fn malformed_reply(msg: impl Into<String>) -> Self {
        Self::MalformedReply(msg.into())
    }

    /// Create a template error.
    #[must_use]
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Returns `true` for errors that must reach the caller instead of being
    /// turned into a fallback or unavailable outcome.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidInput(_) | Self::Template(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedReply(err.to_string())
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(Error::configuration("missing key").is_fatal());
        assert!(Error::invalid_input("blank").is_fatal());
        assert!(Error::template("bad").is_fatal());
        assert!(!Error::malformed_reply("broken").is_fatal());
        assert!(!Error::schema_validation("rating", "too big").is_fatal());
        assert!(!Error::from(LlmError::network("down")).is_fatal());
    }

    #[test]
    fn from_llm_error() {
        let err: Error = LlmError::rate_limited("deepseek").into();
        assert!(matches!(err, Error::Upstream(LlmError::RateLimited { .. })));
        assert!(err.to_string().contains("Rate limit"));
    }

    #[test]
    fn from_json_error_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::MalformedReply(_)));
    }

    #[test]
    fn schema_validation_display() {
        let err = Error::schema_validation("rating", "6 is above the maximum 5");
        assert_eq!(
            err.to_string(),
            "Schema validation failed for 'rating': 6 is above the maximum 5"
        );
    }

    #[test]
    fn error_chain_llm_to_error() {
        fn inner() -> std::result::Result<(), LlmError> {
            Err(LlmError::network("test"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer().unwrap_err(), Error::Upstream(_)));
    }
}
