use serde_json::Value;

use super::types::{QwenErrorData, QwenErrorResponse};
use crate::error::LlmError;

/// Provider name carried by errors raised from payloads inside a stream
pub const QWEN_ERROR_PROVIDER: &str = "qwen";

impl QwenErrorData {
    /// `code` as a string, whether the backend sent a string or a number.
    pub fn code_string(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Error for a payload delivered inside a successful stream.
    pub fn into_llm_error(self) -> LlmError {
        let error_code = self.code_string();
        LlmError::ProviderError {
            provider: QWEN_ERROR_PROVIDER.to_string(),
            message: self.message,
            error_code,
        }
    }
}

/// Classify a non-success HTTP response by parsing the Qwen error envelope.
///
/// Falls back to the raw body (or the status reason when the body is empty).
pub fn classify_qwen_http_error(status: u16, body_text: &str) -> LlmError {
    if let Ok(details) = serde_json::from_str::<Value>(body_text)
        && let Ok(envelope) = serde_json::from_value::<QwenErrorResponse>(details.clone())
    {
        return LlmError::ApiError {
            code: status,
            message: envelope.into_data().message,
            details: Some(details),
        };
    }

    let message = if body_text.trim().is_empty() {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body_text.to_string()
    };
    LlmError::ApiError {
        code: status,
        message,
        details: None,
    }
}
