//! The model completion service seam
//!
//! The orchestrator only ever talks to a `ModelService`. Transport, auth and
//! provider quirks live behind it.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{AiTool, AiToolCall, ModelMessage};

/// One completion request: system prompt, full history, allowed tools
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system_prompt: &'a str,
    pub messages: &'a [ModelMessage],
    pub tools: &'a [AiTool],
}

/// Model response: optional text plus zero or more tool calls
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub text: String,
    pub tool_calls: Vec<AiToolCall>,
}

impl ModelResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Transport-level failure talking to the model service
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Other(String),
}

/// External completion service
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError>;
}
