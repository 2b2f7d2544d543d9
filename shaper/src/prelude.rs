//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shaper::prelude::*;
//! ```

pub use crate::chat::{ChatProvider, ChatRequest, ChatResponse, SharedChatProvider};
pub use crate::error::{Error, LlmError, Result};
pub use crate::extraction::{Extraction, FieldValue, Record};
pub use crate::format::{FormatStyle, format_instructions};
pub use crate::invoker::{ModelInvoker, ModelSettings};
pub use crate::llms::{DeepSeek, DeepSeekConfig, MockProvider};
pub use crate::message::{Message, Role};
pub use crate::parser::ParseStrategy;
pub use crate::pipeline::{Pipeline, PipelineBuilder};
pub use crate::prompts::{PromptRenderer, PromptTemplate};
pub use crate::schema::{Constraint, FieldSpec, FieldType, Schema, SchemaBuilder};
pub use crate::tasks::{
    ResumeExtraction, ResumeExtractor, ResumeInfo, ReviewAnalysis, ReviewAnalyzer, Sentiment,
    TextTransformation, TextTransformer, Transformed,
};
