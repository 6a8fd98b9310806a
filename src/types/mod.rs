//! Provider-agnostic request, response and streaming types.

pub mod call;
pub mod chat;
pub mod provider_metadata;
pub mod response;
pub mod streaming;
pub mod tools;

pub use call::{CallOptions, CallWarning, InputFormat, ModelMode, ResponseFormat};
pub use chat::{ChatMessage, ContentPart, MediaSource, Prompt};
pub use provider_metadata::{HasProviderMetadata, ProviderMetadata, extract_provider_metadata};
pub use response::{
    EmbeddingResult, EmbeddingUsage, FinishReason, GenerateResult, RawCall, ResponseMetadata,
    Usage,
};
pub use streaming::{LanguageModelStream, StreamPart, StreamResult};
pub use tools::{FunctionTool, Tool, ToolCall, ToolCallType, ToolChoice};
