//! Event protocol for the agentic loop.
//!
//! `LoopEvent` is everything the orchestrator reports while it runs. The CLI
//! renders these; the loop itself never depends on anyone listening.

use serde::Serialize;

use super::subagent::AgentProgress;

/// Events emitted by the agentic orchestrator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoopEvent {
    /// Non-empty text from a model response.
    AssistantText { text: String },

    /// A tool call is about to be dispatched.
    ToolExecuting {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },

    /// Tool execution completed with result.
    ToolResult {
        id: String,
        name: String,
        output: String,
        is_error: bool,
    },

    /// A running subagent made progress (or finished).
    SubagentProgress { progress: AgentProgress },

    /// One model-request/tool-dispatch cycle was committed to history.
    TurnComplete { turn: usize },

    /// The model answered without tool calls.
    Finished { text: String },

    /// The run stopped because the caller cancelled it.
    Cancelled,
}
