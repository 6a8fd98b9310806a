//! Qwen (DashScope compatible-mode) wire format types.
//!
//! Request messages keep their structural fields typed and carry provider
//! metadata in an ordered `extra` map that is flattened on serialization.
//! Response types only model the fields the models read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat message as sent to `/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum QwenMessage {
    System(QwenSystemMessage),
    User(QwenUserMessage),
    Assistant(QwenAssistantMessage),
    Tool(QwenToolMessage),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenSystemMessage {
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenUserMessage {
    pub content: QwenUserContent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// User content: a plain string or a list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QwenUserContent {
    Text(String),
    Parts(Vec<QwenContentPart>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum QwenContentPart {
    #[serde(rename = "text")]
    Text(QwenTextPart),
    #[serde(rename = "image_url")]
    ImageUrl(QwenImagePart),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenTextPart {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenImagePart {
    pub image_url: QwenImageUrl,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenAssistantMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<QwenToolCall>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tool call inside an assistant message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: QwenFunctionCall,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenFunctionCall {
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenToolMessage {
    pub tool_call_id: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token usage as reported by the backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub struct QwenUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
}

impl QwenUsage {
    /// Whether the backend reported at least one counter. `"usage": {}` does not count.
    pub fn is_reported(&self) -> bool {
        self.prompt_tokens.is_some() || self.completion_tokens.is_some()
    }
}

impl From<QwenUsage> for crate::types::Usage {
    fn from(usage: QwenUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }
    }
}

/// Literal `"error"` in the `object` field of an error payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QwenErrorObject {
    #[serde(rename = "error")]
    Error,
}

/// Error payload: `{object: "error", message, type, param, code}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QwenErrorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<QwenErrorObject>,
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    /// String in practice, numeric on some gateways
    #[serde(default)]
    pub code: Option<Value>,
}

/// Error envelope, bare or wrapped as `{"error": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QwenErrorResponse {
    Wrapped { error: QwenErrorData },
    Bare(QwenErrorData),
}

impl QwenErrorResponse {
    pub fn data(&self) -> &QwenErrorData {
        match self {
            Self::Wrapped { error } => error,
            Self::Bare(error) => error,
        }
    }

    pub fn into_data(self) -> QwenErrorData {
        match self {
            Self::Wrapped { error } => error,
            Self::Bare(error) => error,
        }
    }
}

/// A stream frame: either an API error payload or a data chunk
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QwenStreamFrame<T> {
    Error(QwenErrorResponse),
    Data(T),
}

/// `/completions` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<QwenCompletionChoice>,
    #[serde(default)]
    pub usage: Option<QwenUsage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenCompletionChoice {
    pub text: String,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Streamed `/completions` chunk
pub type QwenCompletionChunk = QwenStreamFrame<QwenCompletionResponse>;

/// `/chat/completions` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<QwenChatChoice>,
    #[serde(default)]
    pub usage: Option<QwenUsage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenChatChoice {
    pub message: QwenResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct QwenResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<QwenResponseToolCall>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenResponseToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: QwenFunctionCall,
}

/// Streamed `/chat/completions` chunk payload
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenChatChunkData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<QwenChatChunkChoice>,
    #[serde(default)]
    pub usage: Option<QwenUsage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenChatChunkChoice {
    #[serde(default)]
    pub delta: Option<QwenChatDelta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct QwenChatDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<QwenToolCallDelta>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenToolCallDelta {
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<QwenFunctionDelta>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct QwenFunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

pub type QwenChatChunk = QwenStreamFrame<QwenChatChunkData>;

/// `/embeddings` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenEmbeddingResponse {
    pub data: Vec<QwenEmbeddingData>,
    #[serde(default)]
    pub usage: Option<QwenEmbeddingUsage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QwenEmbeddingData {
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct QwenEmbeddingUsage {
    pub prompt_tokens: u32,
}
