//! Response types for generate and embed calls.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::call::CallWarning;
use super::tools::ToolCall;

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
    Other,
    #[default]
    Unknown,
}

/// Token usage. `None` means the backend never reported the counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Usage {
    #[serde(rename = "promptTokens")]
    pub prompt_tokens: Option<u32>,
    #[serde(rename = "completionTokens")]
    pub completion_tokens: Option<u32>,
}

impl Usage {
    /// Neither counter reported.
    pub const UNKNOWN: Usage = Usage {
        prompt_tokens: None,
        completion_tokens: None,
    };

    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens: Some(prompt_tokens),
            completion_tokens: Some(completion_tokens),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.prompt_tokens.is_none() && self.completion_tokens.is_none()
    }
}

/// Backend identification of a response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "modelId", default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

/// Raw prompt and settings as sent, for debugging
#[derive(Debug, Clone, PartialEq)]
pub struct RawCall {
    pub raw_prompt: serde_json::Value,
    pub raw_settings: serde_json::Map<String, serde_json::Value>,
}

impl RawCall {
    /// Split request args into the prompt-bearing field and everything else.
    pub(crate) fn from_args(
        args: &serde_json::Map<String, serde_json::Value>,
        prompt_field: &str,
    ) -> Self {
        let mut raw_prompt = serde_json::Value::Null;
        let mut raw_settings = serde_json::Map::new();
        for (key, value) in args {
            if key == prompt_field {
                raw_prompt = value.clone();
            } else {
                raw_settings.insert(key.clone(), value.clone());
            }
        }
        Self {
            raw_prompt,
            raw_settings,
        }
    }
}

/// Result of a non-streaming generate call
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub text: Option<String>,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    pub raw_call: RawCall,
    pub raw_response_headers: HashMap<String, String>,
    pub response: ResponseMetadata,
    pub warnings: Vec<CallWarning>,
    /// JSON request body as sent
    pub request_body: String,
}

/// Embedding token usage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddingUsage {
    pub tokens: u32,
}

/// Result of an embed call
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    pub embeddings: Vec<Vec<f32>>,
    pub usage: Option<EmbeddingUsage>,
    pub raw_response_headers: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finish_reason_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(FinishReason::ToolCalls).unwrap(),
            json!("tool-calls")
        );
        assert_eq!(FinishReason::default(), FinishReason::Unknown);
    }

    #[test]
    fn unknown_usage_serializes_as_nulls() {
        assert!(Usage::UNKNOWN.is_unknown());
        assert_eq!(
            serde_json::to_value(Usage::UNKNOWN).unwrap(),
            json!({ "promptTokens": null, "completionTokens": null })
        );
        assert!(!Usage::new(1, 2).is_unknown());
    }

    #[test]
    fn raw_call_splits_prompt_from_settings() {
        let args = json!({ "model": "m", "prompt": "hi", "seed": 1 });
        let raw = RawCall::from_args(args.as_object().unwrap(), "prompt");
        assert_eq!(raw.raw_prompt, json!("hi"));
        assert_eq!(
            serde_json::Value::Object(raw.raw_settings),
            json!({ "model": "m", "seed": 1 })
        );
    }
}
