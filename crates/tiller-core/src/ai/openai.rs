//! OpenAI-compatible chat/completions client
//!
//! Converts domain messages to the chat/completions wire format, sends them
//! with bearer auth and parses `choices[0].message` back into text and tool
//! calls. Any provider speaking this dialect works (OpenAI, Zhipu, vLLM...).

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::client::{ModelError, ModelRequest, ModelResponse, ModelService};
use super::config::AiClientConfig;
use super::types::{AiTool, AiToolCall, Content, ModelMessage, Role};

/// HTTP client for OpenAI-compatible endpoints
pub struct OpenAiClient {
    http: reqwest::Client,
    config: AiClientConfig,
}

impl OpenAiClient {
    pub fn new(config: AiClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AiClientConfig {
        &self.config
    }

    fn build_body(&self, request: &ModelRequest<'_>) -> Value {
        let mut messages = vec![json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(convert_messages(request.messages));

        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        });
        if !request.tools.is_empty() {
            body["tools"] = Value::Array(convert_tools(request.tools));
        }
        body
    }
}

#[async_trait]
impl ModelService for OpenAiClient {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let body = self.build_body(&request);
        debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.config.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Chat completion request failed");
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().await?;
        parse_response(&json)
    }
}

/// Convert domain messages to chat/completions messages
///
/// Tool-result turns expand to one `tool` message per result; any text
/// segment riding along (reminders) follows as a `user` message.
pub fn convert_messages(messages: &[ModelMessage]) -> Vec<Value> {
    let mut result = Vec::new();

    for msg in messages {
        match msg.role {
            Role::Tool => {
                let mut trailing_text = Vec::new();
                for content in &msg.content {
                    match content {
                        Content::ToolResult {
                            tool_use_id,
                            output,
                            ..
                        } => result.push(json!({
                            "role": "tool",
                            "tool_call_id": tool_use_id,
                            "content": output,
                        })),
                        Content::Text { text } => trailing_text.push(text.as_str()),
                        Content::ToolUse { .. } => {}
                    }
                }
                if !trailing_text.is_empty() {
                    result.push(json!({
                        "role": "user",
                        "content": trailing_text.join("\n\n"),
                    }));
                }
            }
            Role::Assistant => {
                let text = msg.text();
                let tool_calls: Vec<Value> = msg
                    .content
                    .iter()
                    .filter_map(|c| match c {
                        Content::ToolUse { id, name, input } => Some(json!({
                            "id": id,
                            "type": "function",
                            "function": {
                                "name": name,
                                "arguments": input.to_string(),
                            }
                        })),
                        _ => None,
                    })
                    .collect();

                let mut obj = json!({ "role": "assistant" });
                obj["content"] = if text.is_empty() {
                    Value::Null
                } else {
                    Value::String(text)
                };
                if !tool_calls.is_empty() {
                    obj["tool_calls"] = Value::Array(tool_calls);
                }
                result.push(obj);
            }
            Role::User => {
                let text = msg
                    .content
                    .iter()
                    .filter_map(|c| match c {
                        Content::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                if !text.is_empty() {
                    result.push(json!({ "role": "user", "content": text }));
                }
            }
        }
    }

    result
}

/// Convert tool declarations to function tools
pub fn convert_tools(tools: &[AiTool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema,
                }
            })
        })
        .collect()
}

/// Parse a chat/completions response body
///
/// Argument strings that are not valid JSON are passed through as a JSON
/// string; schema validation later rejects them as a recoverable error.
pub fn parse_response(json: &Value) -> Result<ModelResponse, ModelError> {
    let message = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| ModelError::Malformed("missing choices[0].message".to_string()))?;

    let text = message
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        for (index, call) in calls.iter().enumerate() {
            let function = call.get("function");
            let name = function
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .ok_or_else(|| ModelError::Malformed(format!("tool call {index} has no name")))?;
            let id = call
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{index}"));
            let raw = function
                .and_then(|f| f.get("arguments"))
                .cloned()
                .unwrap_or(Value::Null);
            let arguments = match raw {
                Value::String(s) if s.trim().is_empty() => json!({}),
                Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
                Value::Null => json!({}),
                other => other,
            };
            tool_calls.push(AiToolCall {
                id,
                name: name.to_string(),
                arguments,
            });
        }
    }

    Ok(ModelResponse { text, tool_calls })
}
