//! DeepSeek API client implementation.
//!
//! DeepSeek exposes an OpenAI-compatible Chat Completions endpoint; this
//! module supports single, non-streaming completions only.

mod client;
mod config;
mod types;

pub use client::DeepSeek;
pub use config::DeepSeekConfig;
