//! Scripted model service for tests

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::client::{ModelError, ModelRequest, ModelResponse, ModelService};
use super::types::{AiToolCall, ModelMessage};

/// What the scripted model saw on one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system_prompt: String,
    pub messages: Vec<ModelMessage>,
    pub tool_names: Vec<String>,
}

/// Replays a fixed sequence of responses and records every request
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_results(responses: Vec<Result<ModelResponse, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ModelService for ScriptedModel {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        self.requests.lock().push(RecordedRequest {
            system_prompt: request.system_prompt.to_string(),
            messages: request.messages.to_vec(),
            tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Other("script exhausted".to_string())))
    }
}

pub fn text(text: &str) -> ModelResponse {
    ModelResponse {
        text: text.to_string(),
        tool_calls: Vec::new(),
    }
}

pub fn call(id: &str, name: &str, arguments: Value) -> ModelResponse {
    calls(vec![(id, name, arguments)])
}

pub fn calls(calls: Vec<(&str, &str, Value)>) -> ModelResponse {
    ModelResponse {
        text: String::new(),
        tool_calls: calls
            .into_iter()
            .map(|(id, name, arguments)| AiToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            })
            .collect(),
    }
}
