//! Error types for the Qwen provider.
//!
//! Errors are `Clone` so they can travel inside [`crate::types::StreamPart::Error`]
//! events without being consumed.

use thiserror::Error;

/// Unified error type for every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// A user message contained a content part the chat API cannot represent.
    #[error("Unsupported content part: {0}")]
    UnsupportedContentPart(String),

    /// The call requested functionality the selected model does not offer.
    #[error("Unsupported functionality: {0}")]
    UnsupportedFunctionality(String),

    /// The prompt is structurally invalid for the selected model.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// An internal invariant was violated. Indicates a bug, not bad input.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Response or stream frame could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The event stream failed mid-flight.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The API answered with a non-success status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The API delivered an error payload inside an otherwise successful stream.
    #[error("{provider} error: {message}")]
    ProviderError {
        provider: String,
        message: String,
        error_code: Option<String>,
    },

    /// No API key was configured.
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Invalid configuration (headers, base URL, ...).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Too many values were passed to a single embedding call.
    #[error(
        "Too many values for a single embedding call. The {provider} model \"{model_id}\" can only embed up to {max_embeddings_per_call} values per call, but {values} values were provided."
    )]
    TooManyEmbeddingValuesForCall {
        provider: String,
        model_id: String,
        max_embeddings_per_call: usize,
        values: usize,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let llm_err: LlmError = json_err.into();
        assert!(matches!(llm_err, LlmError::JsonError(_)));
    }

    #[test]
    fn too_many_embedding_values_message_names_the_limit() {
        let err = LlmError::TooManyEmbeddingValuesForCall {
            provider: "qwen.embedding".to_string(),
            model_id: "text-embedding-v3".to_string(),
            max_embeddings_per_call: 2048,
            values: 2049,
        };
        let msg = err.to_string();
        assert!(msg.contains("up to 2048 values"));
        assert!(msg.contains("2049 values were provided"));
    }
}
