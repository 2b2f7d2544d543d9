//! Product review analysis.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::SharedChatProvider;
use crate::error::Result;
use crate::extraction::Extraction;
use crate::invoker::ModelSettings;
use crate::parser::ParseStrategy;
use crate::pipeline::Pipeline;
use crate::prompts::PromptTemplate;
use crate::schema::{FieldSpec, Schema};

/// Prompt template; the review goes into `{{ review }}`.
pub const TEMPLATE: &str = r#"You are an expert product review analyst. Analyze the following product review and extract structured insights.

Product Review:
"""{{ review }}"""

Instructions:
- Determine the overall sentiment (Positive, Negative, or Neutral).
- Estimate a rating from 1 (very poor) to 5 (excellent) based on the review.
- List all key features of the product that are mentioned or appreciated.
- List all improvement suggestions or complaints that could help improve the product.

{{ format_instructions }}
Important:
- Return ONLY the JSON object. Do NOT include markdown code blocks or extra text.
- Ensure rating is an integer between 1 and 5.
- Ensure sentiment is exactly one of: Positive, Negative, Neutral.
"#;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Output schema: `sentiment`, `rating`, `key_features`,
/// `improvement_suggestions`.
///
/// # Errors
///
/// Never fails in practice; the signature follows [`Schema::builder`].
pub fn schema() -> Result<Schema> {
    Schema::builder("review_analysis")
        .description("Structured analysis of a product review")
        .field(
            FieldSpec::text(
                "sentiment",
                "Overall sentiment of the review. Must be one of: 'Positive', 'Negative', or 'Neutral'.",
            )
            .one_of(["Positive", "Negative", "Neutral"]),
        )
        .field(
            FieldSpec::integer(
                "rating",
                "Estimated rating on a scale of 1 to 5 based on the review content.",
            )
            .range(1, 5),
        )
        .field(FieldSpec::text_list(
            "key_features",
            "List of key product features mentioned or praised in the review.",
        ))
        .field(FieldSpec::text_list(
            "improvement_suggestions",
            "List of specific suggestions for improving the product based on the review.",
        ))
        .build()
}

/// Overall review sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    /// Favourable.
    Positive,
    /// Unfavourable.
    Negative,
    /// Mixed or indifferent.
    Neutral,
}

impl Sentiment {
    /// Label as used in replies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated review analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    /// Overall sentiment.
    pub sentiment: Sentiment,
    /// Rating in `1..=5`.
    pub rating: u8,
    /// Features mentioned or praised.
    pub key_features: Vec<String>,
    /// Suggested improvements.
    pub improvement_suggestions: Vec<String>,
}

/// Analyses product reviews, returning nothing unless the reply validates.
#[derive(Debug, Clone)]
pub struct ReviewAnalyzer {
    pipeline: Pipeline,
}

impl ReviewAnalyzer {
    /// Creates an analyzer with the default temperature.
    ///
    /// # Errors
    ///
    /// See [`with_settings`](Self::with_settings).
    pub fn new(provider: SharedChatProvider) -> Result<Self> {
        Self::with_settings(provider, ModelSettings::with_temperature(DEFAULT_TEMPERATURE))
    }

    /// Creates an analyzer with explicit model settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline cannot be built.
    pub fn with_settings(provider: SharedChatProvider, settings: ModelSettings) -> Result<Self> {
        let pipeline = Pipeline::builder("analyze")
            .schema(schema()?)
            .template(PromptTemplate::new("analyze", TEMPLATE, "review"))
            .strategy(ParseStrategy::StrictJson)
            .provider(provider)
            .settings(settings)
            .build()?;
        Ok(Self { pipeline })
    }

    /// Underlying pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Analyses one review. `None` means the analysis is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) for
    /// blank text.
    pub async fn analyze(&self, review: &str) -> Result<Option<ReviewAnalysis>> {
        match self.pipeline.run(review).await? {
            Extraction::Complete(record) => match record.deserialize() {
                Ok(analysis) => Ok(Some(analysis)),
                Err(error) => {
                    warn!(error = %error, "validated record did not convert");
                    Ok(None)
                }
            },
            Extraction::Fallback { .. } | Extraction::Unavailable { .. } => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llms::MockProvider;

    fn analyzer(reply: &str) -> ReviewAnalyzer {
        ReviewAnalyzer::new(Arc::new(MockProvider::new([reply]))).unwrap()
    }

    #[tokio::test]
    async fn valid_reply_is_typed() {
        let reply = r#"{"sentiment":"Negative","rating":2,"key_features":["battery"],"improvement_suggestions":["faster charging"]}"#;
        let analysis = analyzer(reply).analyze("review").await.unwrap().unwrap();
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert_eq!(analysis.rating, 2);
        assert_eq!(analysis.improvement_suggestions, ["faster charging"]);
    }

    #[tokio::test]
    async fn constraint_violations_are_unavailable() {
        for reply in [
            r#"{"sentiment":"Positive","rating":6,"key_features":[],"improvement_suggestions":[]}"#,
            r#"{"sentiment":"Positive","rating":0,"key_features":[],"improvement_suggestions":[]}"#,
            r#"{"sentiment":"Great","rating":4,"key_features":[],"improvement_suggestions":[]}"#,
            r#"{"sentiment":"Positive","rating":4,"key_features":[]}"#,
            "not json at all",
        ] {
            assert!(analyzer(reply).analyze("review").await.unwrap().is_none(), "{reply}");
        }
    }

    #[test]
    fn schema_declares_bounds() {
        let schema = schema().unwrap();
        let rating = schema.field("rating").unwrap();
        assert_eq!(rating.constraints, [crate::schema::Constraint::range(1, 5)]);
    }
}
