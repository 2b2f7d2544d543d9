//! Prompt template definitions.

use serde::{Deserialize, Serialize};

/// Placeholder every template receives the format instructions through.
pub const FORMAT_INSTRUCTIONS_VAR: &str = "format_instructions";

/// A fixed instructional template for one use case.
///
/// The source is Jinja2 syntax with two placeholders: `{{ <input_variable> }}`
/// for the caller's text and `{{ format_instructions }}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name, used in error messages.
    pub name: String,
    /// Template source.
    pub source: String,
    /// Placeholder that receives the user text.
    pub input_variable: String,
}

impl PromptTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        input_variable: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            input_variable: input_variable.into(),
        }
    }
}
