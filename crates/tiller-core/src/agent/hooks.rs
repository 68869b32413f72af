//! Hook system for tool execution
//!
//! Post-execution hooks observe every dispatched call after its result is
//! final. They cannot alter the result.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::tools::registry::ToolResult;

/// Runs after a tool has produced its (capped) result
#[async_trait]
pub trait PostToolHook: Send + Sync {
    async fn after_execute(&self, name: &str, params: &Value, result: &ToolResult, duration: Duration);
}

/// Logs all tool executions with timing
pub struct LoggingHook;

impl LoggingHook {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostToolHook for LoggingHook {
    async fn after_execute(
        &self,
        name: &str,
        _params: &Value,
        result: &ToolResult,
        duration: Duration,
    ) {
        tracing::info!(
            tool = name,
            duration_ms = duration.as_millis() as u64,
            is_error = result.is_error,
            truncated = result.truncated,
            output_len = result.output.len(),
            "Tool execution completed"
        );
    }
}
