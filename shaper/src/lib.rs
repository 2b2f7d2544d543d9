//! Shaper - structured extraction from hosted LLM chat APIs
//!
//! This crate renders a prompt from a fixed template and caller text, sends it
//! to a chat-completion endpoint, and coerces the free-text reply into one of
//! three shapes: labeled plain-text sections, loosely checked JSON with a
//! default-valued fallback, or strictly validated JSON that may come back
//! unavailable.

pub mod chat;
pub mod error;
pub mod extraction;
pub mod format;
pub mod invoker;
pub mod llms;
pub mod message;
pub mod parser;
pub mod pipeline;
pub mod prelude;
pub mod prompts;
pub mod schema;
pub mod tasks;

pub use error::{Error, LlmError, Result};
