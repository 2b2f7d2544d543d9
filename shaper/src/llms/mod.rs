//! Model client implementations.
//!
//! # Available Clients
//!
//! - [`deepseek`] - DeepSeek (OpenAI-compatible) Chat Completions API
//! - [`mock`] - Scripted in-process client for tests and offline runs

pub mod deepseek;
pub mod error;
pub mod mock;

pub use deepseek::{DeepSeek, DeepSeekConfig};
pub use error::LlmError;
pub use mock::MockProvider;
