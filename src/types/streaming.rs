//! Streaming event types for real-time responses

use std::collections::HashMap;
use std::pin::Pin;

use futures::Stream;

use super::call::CallWarning;
use super::response::{FinishReason, RawCall, ResponseMetadata, Usage};
use super::tools::{ToolCall, ToolCallType};
use crate::error::LlmError;

/// Generic stream event produced by a language model
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPart {
    /// Emitted once, before anything else derived from the first valid chunk
    ResponseMetadata(ResponseMetadata),
    /// Incremental text, forwarded verbatim (empty strings included)
    TextDelta { text_delta: String },
    /// Incremental reasoning text
    ReasoningDelta { text_delta: String },
    /// Incremental tool call arguments
    ToolCallDelta {
        tool_call_type: ToolCallType,
        tool_call_id: String,
        tool_name: String,
        args_text_delta: String,
    },
    /// A complete tool call
    ToolCall(ToolCall),
    /// A recoverable per-event failure; the stream continues
    Error { error: LlmError },
    /// Always the last event of a stream that ran to completion
    Finish {
        finish_reason: FinishReason,
        usage: Usage,
    },
}

impl StreamPart {
    pub fn is_finish(&self) -> bool {
        matches!(self, Self::Finish { .. })
    }
}

/// Lazily consumed stream of [`StreamPart`]s
pub type LanguageModelStream = Pin<Box<dyn Stream<Item = StreamPart> + Send>>;

/// Result of a streaming call
pub struct StreamResult {
    pub stream: LanguageModelStream,
    pub raw_call: RawCall,
    pub raw_response_headers: HashMap<String, String>,
    pub warnings: Vec<CallWarning>,
    /// JSON request body as sent
    pub request_body: String,
}

impl std::fmt::Debug for StreamResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResult")
            .field("raw_call", &self.raw_call)
            .field("raw_response_headers", &self.raw_response_headers)
            .field("warnings", &self.warnings)
            .field("request_body", &self.request_body)
            .finish_non_exhaustive()
    }
}
