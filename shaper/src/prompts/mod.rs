//! Prompt templates and rendering.
//!
//! A use case owns one fixed [`PromptTemplate`]; the [`PromptRenderer`]
//! merges it with the caller's text and the schema's format instructions.
//!
//! # Example
//!
//! ```rust,ignore
//! use shaper::prompts::{PromptRenderer, PromptTemplate};
//!
//! let template = PromptTemplate::new(
//!     "transform",
//!     "Paragraph:\n{{ paragraph }}\n\n{{ format_instructions }}",
//!     "paragraph",
//! );
//! let prompt = PromptRenderer::new().render(&template, text, &instructions)?;
//! ```

mod renderer;
mod template;

pub use renderer::PromptRenderer;
pub use template::{FORMAT_INSTRUCTIONS_VAR, PromptTemplate};
