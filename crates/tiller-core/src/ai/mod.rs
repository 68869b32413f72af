//! Model-facing types and the completion service seam

pub mod client;
pub mod config;
pub mod openai;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ModelError, ModelRequest, ModelResponse, ModelService};
pub use config::AiClientConfig;
pub use openai::OpenAiClient;
pub use types::{AiTool, AiToolCall, Content, ModelMessage, Role};
