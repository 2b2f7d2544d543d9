//! Pipeline orchestration.
//!
//! A [`Pipeline`] ties one schema, template and parse strategy to a model
//! client: render, invoke, parse. Rendering errors reach the caller; model
//! and parse errors become the strategy's recovery outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use shaper::prelude::*;
//!
//! let pipeline = Pipeline::builder("review")
//!     .schema(schema)
//!     .template(template)
//!     .strategy(ParseStrategy::StrictJson)
//!     .provider(provider)
//!     .build()?;
//!
//! match pipeline.run(review_text).await? {
//!     Extraction::Complete(record) => println!("{}", record.to_json()),
//!     other => eprintln!("{:?}", other.error()),
//! }
//! ```

use tracing::{Instrument, debug, info, info_span, warn};

use crate::chat::SharedChatProvider;
use crate::error::{Error, Result};
use crate::extraction::Extraction;
use crate::format::format_instructions;
use crate::invoker::{ModelInvoker, ModelSettings};
use crate::parser::ParseStrategy;
use crate::prompts::{PromptRenderer, PromptTemplate};
use crate::schema::Schema;

/// A configured extraction pipeline.
///
/// Immutable after construction; share it behind an `Arc` for concurrent runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    schema: Schema,
    template: PromptTemplate,
    strategy: ParseStrategy,
    instructions: String,
    renderer: PromptRenderer,
    invoker: ModelInvoker,
}

impl Pipeline {
    /// Starts building a pipeline.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// Pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Prompt template.
    #[must_use]
    pub const fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Parse strategy.
    #[must_use]
    pub const fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    /// Format instructions injected into every prompt.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Model invoker.
    #[must_use]
    pub const fn invoker(&self) -> &ModelInvoker {
        &self.invoker
    }

    /// Renders the prompt for `text` without calling the model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank text and [`Error::Template`]
    /// if rendering fails.
    pub fn render(&self, text: &str) -> Result<String> {
        self.renderer
            .render(&self.template, text, &self.instructions)
    }

    /// Runs the pipeline once.
    ///
    /// Makes exactly one model call when rendering succeeds.
    ///
    /// # Errors
    ///
    /// Only rendering errors are returned; see [`render`](Self::render).
    pub async fn run(&self, text: &str) -> Result<Extraction> {
        let span = info_span!("pipeline", task = %self.name, strategy = %self.strategy);
        async move {
            let prompt = self.render(text)?;
            debug!(prompt_len = prompt.len(), "prompt rendered");

            let extraction = match self.invoker.invoke(&prompt).await {
                Ok(reply) => self.strategy.parse(&reply, &self.schema),
                Err(error) => self.strategy.recover(&self.schema, error),
            };

            if let Some(error) = extraction.error() {
                let retryable = matches!(error, Error::Upstream(e) if e.is_retryable());
                warn!(error = %error, retryable, outcome = extraction.outcome(), "extraction degraded");
            }
            info!(outcome = extraction.outcome(), "pipeline run complete");
            Ok(extraction)
        }
        .instrument(span)
        .await
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    name: String,
    schema: Option<Schema>,
    template: Option<PromptTemplate>,
    strategy: Option<ParseStrategy>,
    provider: Option<SharedChatProvider>,
    settings: ModelSettings,
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("schema", &self.schema.as_ref().map(Schema::name))
            .field("strategy", &self.strategy)
            .field("provider", &self.provider.as_ref().map(|p| p.provider_name()))
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the output schema.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the prompt template.
    #[must_use]
    pub fn template(mut self, template: PromptTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Sets the parse strategy.
    #[must_use]
    pub const fn strategy(mut self, strategy: ParseStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the model client.
    #[must_use]
    pub fn provider(mut self, provider: SharedChatProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the model settings.
    #[must_use]
    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Validates the parts and builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a part is missing and
    /// [`Error::Template`] if the template does not check out.
    pub fn build(self) -> Result<Pipeline> {
        let Self {
            name,
            schema,
            template,
            strategy,
            provider,
            settings,
        } = self;

        let missing =
            |part: &str| Error::configuration(format!("pipeline '{name}' has no {part}"));
        let schema = schema.ok_or_else(|| missing("schema"))?;
        let template = template.ok_or_else(|| missing("template"))?;
        let strategy = strategy.ok_or_else(|| missing("parse strategy"))?;
        let provider = provider.ok_or_else(|| missing("model provider"))?;

        let renderer = PromptRenderer::new();
        renderer.check(&template)?;
        let instructions = format_instructions(&schema, strategy.format_style());

        Ok(Pipeline {
            name,
            schema,
            template,
            strategy,
            instructions,
            renderer,
            invoker: ModelInvoker::new(provider, settings),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::clone_on_ref_ptr)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::LlmError;
    use crate::llms::MockProvider;
    use crate::schema::FieldSpec;

    fn schema() -> Schema {
        Schema::builder("person")
            .field(FieldSpec::text("name", "Full name"))
            .build()
            .unwrap()
    }

    fn template() -> PromptTemplate {
        PromptTemplate::new("person", "Text:\n{{ text }}\n\n{{ format_instructions }}", "text")
    }

    fn pipeline(mock: Arc<MockProvider>, strategy: ParseStrategy) -> Pipeline {
        Pipeline::builder("person")
            .schema(schema())
            .template(template())
            .strategy(strategy)
            .provider(mock)
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_every_part() {
        let err = Pipeline::builder("p").schema(schema()).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn build_checks_template() {
        let err = Pipeline::builder("p")
            .schema(schema())
            .template(PromptTemplate::new("t", "{{ other }}", "text"))
            .strategy(ParseStrategy::LooseJson)
            .provider(Arc::new(MockProvider::new(["{}"])))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[tokio::test]
    async fn prompt_carries_text_and_instructions() {
        let mock = Arc::new(MockProvider::new([r#"{"name":"Ada"}"#]));
        let pipeline = pipeline(mock.clone(), ParseStrategy::LooseJson);

        let extraction = pipeline.run("  Ada Lovelace  ").await.unwrap();
        assert_eq!(extraction.record().unwrap().text("name"), Some("Ada"));

        let prompt = &mock.last_request().await.unwrap().messages[0].content;
        assert!(prompt.starts_with("Text:\nAda Lovelace\n\n"));
        assert!(prompt.ends_with(pipeline.instructions()));
    }

    #[tokio::test]
    async fn blank_input_never_calls_provider() {
        let mock = Arc::new(MockProvider::new(["unused"]));
        let pipeline = pipeline(mock.clone(), ParseStrategy::StrictJson);

        let err = pipeline.run(" \n ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_absorbed() {
        let mock = Arc::new(MockProvider::failing(LlmError::rate_limited("mock")));

        let loose = pipeline(mock.clone(), ParseStrategy::LooseJson).run("x").await.unwrap();
        assert!(matches!(loose, Extraction::Fallback { error: Error::Upstream(_), .. }));

        let strict = pipeline(mock.clone(), ParseStrategy::StrictJson).run("x").await.unwrap();
        assert!(matches!(strict, Extraction::Unavailable { error: Error::Upstream(_) }));
        assert_eq!(mock.call_count(), 2);
    }
}
