//! LLM Client: the single point of entry for all completion-service calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! Engines depend on the `CompletionService` capability, never on `LlmClient`,
//! so tests can substitute a deterministic fake.
//!
//! Model: claude-sonnet-4-5 (hardcoded, do not make configurable to prevent drift)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::retry::Retryable;

pub mod prompts;
pub mod retry;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
/// A full dossier with detailed experiences is long; leave room for it.
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No reply within {secs}s")]
    Timeout { secs: u64 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<LlmError> },
}

impl Retryable for LlmError {
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) | LlmError::Timeout { .. } | LlmError::EmptyContent => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Parse(_) => true,
            LlmError::Exhausted { .. } => false,
        }
    }

    fn exhausted(attempts: u32, last: Self) -> Self {
        LlmError::Exhausted {
            attempts,
            last: Box::new(last),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capability interface
// ────────────────────────────────────────────────────────────────────────────

/// A function-call style tool the model is forced to answer with.
#[derive(Debug, Clone)]
pub struct ToolSpec<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub input_schema: &'a Value,
}

/// One request to the completion service.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    /// When set, the reply is constrained to this tool's input schema.
    pub tool: Option<ToolSpec<'a>>,
}

/// What came back, before any parsing or validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReply {
    ToolCall { name: String, input: Value },
    Text(String),
}

/// The completion service as seen by the engines.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate_structured(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<RawReply, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<AnthropicToolChoice<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct AnthropicToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
    pub name: Option<String>,
    pub input: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Prefers a tool-use block; falls back to the first text block.
    pub fn into_reply(self) -> Result<RawReply, LlmError> {
        let mut text = None;
        for block in self.content {
            match block.block_type.as_str() {
                "tool_use" => {
                    if let (Some(name), Some(input)) = (block.name, block.input) {
                        return Ok(RawReply::ToolCall { name, input });
                    }
                }
                "text" if text.is_none() => text = block.text,
                _ => {}
            }
        }
        text.filter(|t| !t.trim().is_empty())
            .map(RawReply::Text)
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production completion service: the Anthropic Messages API.
/// One HTTP round trip per call; retry belongs to the caller's `RetryPolicy`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Makes a single call to the Messages API, returning the full response object.
    pub async fn call(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, LlmError> {
        let (tools, tool_choice) = match &request.tool {
            Some(tool) => (
                vec![AnthropicTool {
                    name: tool.name,
                    description: tool.description,
                    input_schema: tool.input_schema,
                }],
                Some(AnthropicToolChoice {
                    choice_type: "tool",
                    name: tool.name,
                }),
            ),
            None => (Vec::new(), None),
        };

        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
            tools,
            tool_choice,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn generate_structured(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<RawReply, LlmError> {
        self.call(request).await?.into_reply()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reply parsing helpers
// ────────────────────────────────────────────────────────────────────────────

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Parses a JSON reply, tolerating code fences and conversational text around
/// the object: a failed direct parse is retried from the first `{`, and
/// anything after the first complete value is ignored.
pub fn parse_json_lenient(text: &str) -> Result<Value, serde_json::Error> {
    let text = strip_json_fences(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(direct) => {
            let Some(start) = text.find('{') else {
                return Err(direct);
            };
            let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
            match values.next() {
                Some(result) => result,
                None => Err(direct),
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test double
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Replays scripted replies in order and records every prompt it saw.
    #[derive(Default)]
    pub struct ScriptedCompletion {
        replies: Mutex<VecDeque<Result<RawReply, LlmError>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedCompletion {
        pub fn new(replies: Vec<Result<RawReply, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    /// Answers by inspecting each request; for callers whose call order is not fixed.
    pub struct FnCompletion<F> {
        respond: F,
        prompts: Mutex<Vec<String>>,
    }

    impl<F> FnCompletion<F>
    where
        F: Fn(&CompletionRequest<'_>) -> Result<RawReply, LlmError> + Send + Sync,
    {
        pub fn new(respond: F) -> Self {
            Self {
                respond,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl<F> CompletionService for FnCompletion<F>
    where
        F: Fn(&CompletionRequest<'_>) -> Result<RawReply, LlmError> + Send + Sync,
    {
        async fn generate_structured(
            &self,
            request: &CompletionRequest<'_>,
        ) -> Result<RawReply, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt.to_string());
            (self.respond)(request)
        }
    }

    pub fn unavailable() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn generate_structured(
            &self,
            request: &CompletionRequest<'_>,
        ) -> Result<RawReply, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_json_lenient_skips_leading_chatter() {
        let input = "Here is the ranking you asked for:\n{\"results\": []}";
        let value = parse_json_lenient(input).unwrap();
        assert_eq!(value["results"], serde_json::json!([]));
    }

    #[test]
    fn test_parse_json_lenient_ignores_trailing_chatter() {
        let input = "{\"results\": [1]}\nLet me know if you need anything else.";
        let value = parse_json_lenient(input).unwrap();
        assert_eq!(value["results"][0], 1);
    }

    #[test]
    fn test_parse_json_lenient_rejects_prose() {
        assert!(parse_json_lenient("I cannot rank these candidates.").is_err());
    }

    #[test]
    fn test_into_reply_prefers_tool_use() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "text", "text": "Sure."},
                {"type": "tool_use", "id": "toolu_1", "name": "extract_cv_data", "input": {"header": {}}}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();
        match response.into_reply().unwrap() {
            RawReply::ToolCall { name, input } => {
                assert_eq!(name, "extract_cv_data");
                assert!(input.get("header").is_some());
            }
            other => panic!("expected tool call, got {other:?}"),
        }
    }

    #[test]
    fn test_into_reply_empty_content_is_error() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [{"type": "text", "text": "  "}],
            "usage": {"input_tokens": 10, "output_tokens": 0}
        }))
        .unwrap();
        assert!(matches!(response.into_reply(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        let rate_limited = LlmError::Api {
            status: 429,
            message: String::new(),
        };
        let bad_request = LlmError::Api {
            status: 400,
            message: String::new(),
        };
        assert!(rate_limited.is_retryable());
        assert!(testing::unavailable().is_retryable());
        assert!(!bad_request.is_retryable());
    }

    #[test]
    fn test_tool_request_serializes_forced_choice() {
        let schema = serde_json::json!({"type": "object"});
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: "sys",
            messages: vec![AnthropicMessage {
                role: "user",
                content: "cv",
            }],
            tools: vec![AnthropicTool {
                name: "extract_cv_data",
                description: "d",
                input_schema: &schema,
            }],
            tool_choice: Some(AnthropicToolChoice {
                choice_type: "tool",
                name: "extract_cv_data",
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["tool_choice"]["type"], "tool");
        assert_eq!(json["tools"][0]["input_schema"]["type"], "object");
    }
}
