//! AI client configuration

/// Default OpenAI-compatible endpoint base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model id
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Default max output tokens per completion
pub const DEFAULT_MAX_TOKENS: usize = 8000;

/// Configuration for the OpenAI-compatible client
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    /// Model ID to use for API calls
    pub model: String,
    /// Maximum output tokens
    pub max_tokens: usize,
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl AiClientConfig {
    /// Full chat completions URL
    pub fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_strips_trailing_slash() {
        let config = AiClientConfig {
            base_url: "https://example.test/v4/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://example.test/v4/chat/completions");
    }
}
