//! Resume information extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::SharedChatProvider;
use crate::error::Result;
use crate::invoker::ModelSettings;
use crate::parser::ParseStrategy;
use crate::pipeline::Pipeline;
use crate::prompts::PromptTemplate;
use crate::schema::{FieldSpec, Schema};

/// Prompt template; the resume goes into `{{ resume_text }}`.
pub const TEMPLATE: &str = "\
You are an expert resume parser and information extraction specialist.
Your job is to carefully read a resume and extract specific structured information.

RULES:
- Extract ONLY information explicitly present in the resume
- For experience_years: calculate total work experience in whole years
- For skills: include all mentioned technologies, tools, languages, and soft skills
- For education: include degrees, certifications, and institutions
- If any field is missing, use: \"\" for strings, 0 for numbers, [] for lists

{{ format_instructions }}
Extract structured information from this resume:

==================== RESUME ====================
{{ resume_text }}
================================================";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Output schema: `name`, `email`, `skills`, `experience_years`, `education`.
///
/// # Errors
///
/// Never fails in practice; the signature follows [`Schema::builder`].
pub fn schema() -> Result<Schema> {
    Schema::builder("resume_info")
        .description("Structured data extracted from a resume")
        .field(FieldSpec::text("name", "Full name of the candidate"))
        .field(FieldSpec::text("email", "Email address of the candidate"))
        .field(FieldSpec::text_list(
            "skills",
            "List of all technical and soft skills mentioned",
        ))
        .field(FieldSpec::integer(
            "experience_years",
            "Total years of professional work experience as a whole number",
        ))
        .field(FieldSpec::text_list(
            "education",
            "List of educational degrees and certifications with institutions",
        ))
        .build()
}

/// Extracted resume fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeInfo {
    /// Candidate name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Skills mentioned.
    pub skills: Vec<String>,
    /// Total years of experience.
    pub experience_years: i64,
    /// Degrees and certifications.
    pub education: Vec<String>,
}

/// Result of [`ResumeExtractor::extract`].
///
/// On failure `info` holds defaults and `extraction_error` the reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeExtraction {
    /// Extracted fields.
    #[serde(flatten)]
    pub info: ResumeInfo,
    /// Why extraction failed, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl ResumeExtraction {
    /// Returns `true` if extraction failed.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.extraction_error.is_some()
    }

    /// Flat JSON object; failures add an `extraction_error` key.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Extracts structured data from resumes.
#[derive(Debug, Clone)]
pub struct ResumeExtractor {
    pipeline: Pipeline,
}

impl ResumeExtractor {
    /// Creates an extractor with the default temperature.
    ///
    /// # Errors
    ///
    /// See [`with_settings`](Self::with_settings).
    pub fn new(provider: SharedChatProvider) -> Result<Self> {
        Self::with_settings(provider, ModelSettings::with_temperature(DEFAULT_TEMPERATURE))
    }

    /// Creates an extractor with explicit model settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline cannot be built.
    pub fn with_settings(provider: SharedChatProvider, settings: ModelSettings) -> Result<Self> {
        let pipeline = Pipeline::builder("extract")
            .schema(schema()?)
            .template(PromptTemplate::new("extract", TEMPLATE, "resume_text"))
            .strategy(ParseStrategy::LooseJson)
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

    /// Extracts one resume.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::error::Error::InvalidInput) for
    /// blank text. Model and parse failures yield a default-valued result
    /// with `extraction_error` set.
    pub async fn extract(&self, resume_text: &str) -> Result<ResumeExtraction> {
        let extraction = self.pipeline.run(resume_text).await?;
        let (info, error) = super::typed_or_default(extraction);
        Ok(ResumeExtraction {
            info,
            extraction_error: error.map(|e| e.to_string()),
        })
    }
}
