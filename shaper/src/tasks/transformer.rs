//! Paragraph summary, tone and rewrite.

use serde::{Deserialize, Serialize};

use crate::chat::SharedChatProvider;
use crate::error::{Error, Result};
use crate::invoker::ModelSettings;
use crate::parser::ParseStrategy;
use crate::pipeline::Pipeline;
use crate::prompts::PromptTemplate;
use crate::schema::{FieldSpec, Schema};

/// Prompt template; the paragraph goes into `{{ paragraph }}`.
pub const TEMPLATE: &str = "\
You are an expert writing assistant. Analyze the paragraph below and respond in plain text only.

Paragraph:
{{ paragraph }}

{{ format_instructions }}";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Allowed tone labels.
pub const TONES: [&str; 3] = ["Formal", "Casual", "Technical"];

/// Output schema: `summary`, `tone`, `improved_version`.
///
/// # Errors
///
/// Never fails in practice; the signature follows [`Schema::builder`].
pub fn schema() -> Result<Schema> {
    Schema::builder("text_transformation")
        .description("Summary, tone and improved version of a paragraph")
        .field(FieldSpec::text(
            "summary",
            "A 3 to 4 line summary of the paragraph.",
        ))
        .field(
            FieldSpec::text("tone", "Exactly one word describing the tone of the paragraph.")
                .one_of(TONES),
        )
        .field(FieldSpec::text(
            "improved_version",
            "A clearly improved version of the paragraph, fixing grammar, flow and clarity.",
        ))
        .build()
}

/// Sections of a transformed paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextTransformation {
    /// Short summary.
    pub summary: String,
    /// Tone label.
    pub tone: String,
    /// Rewritten paragraph.
    pub improved_version: String,
}

/// Result of [`TextTransformer::transform`]. On failure the sections are
/// empty and `error` says why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// The sections, empty on failure.
    pub transformation: TextTransformation,
    /// Why the sections are empty, if they are.
    pub error: Option<Error>,
}

/// Summarises, classifies and rewrites paragraphs.
#[derive(Debug, Clone)]
pub struct TextTransformer {
    pipeline: Pipeline,
}

impl TextTransformer {
    /// Creates a transformer with the default temperature.
    ///
    /// # Errors
    ///
    /// See [`with_settings`](Self::with_settings).
    pub fn new(provider: SharedChatProvider) -> Result<Self> {
        Self::with_settings(provider, ModelSettings::with_temperature(DEFAULT_TEMPERATURE))
    }

    /// Creates a transformer with explicit model settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline cannot be built.
    pub fn with_settings(provider: SharedChatProvider, settings: ModelSettings) -> Result<Self> {
        let pipeline = Pipeline::builder("transform")
            .schema(schema()?)
            .template(PromptTemplate::new("transform", TEMPLATE, "paragraph"))
            .strategy(ParseStrategy::Sections)
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

    /// Transforms one paragraph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank paragraph. Model and parse
    /// failures are reported through [`Transformed::error`].
    pub async fn transform(&self, paragraph: &str) -> Result<Transformed> {
        let extraction = self.pipeline.run(paragraph).await?;
        let (transformation, error) = super::typed_or_default(extraction);
        Ok(Transformed {
            transformation,
            error,
        })
    }
}
