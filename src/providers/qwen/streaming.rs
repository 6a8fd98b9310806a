//! Qwen streaming reducers
//!
//! Each reducer owns the state of one streaming call: the running finish
//! reason, the last reported usage and whether response metadata was sent.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::warn;

use super::types::{
    QwenChatChunk, QwenChatChunkData, QwenCompletionChunk, QwenErrorResponse, QwenStreamFrame,
    QwenToolCallDelta, QwenUsage,
};
use super::utils::{get_response_metadata, map_qwen_finish_reason};
use crate::error::LlmError;
use crate::types::{FinishReason, StreamPart, ToolCall, ToolCallType, Usage};
use crate::utils::StreamReducer;

/// State shared by both reducers
#[derive(Debug)]
struct ReductionState {
    finish_reason: FinishReason,
    usage: Usage,
    is_first_chunk: bool,
}

impl Default for ReductionState {
    fn default() -> Self {
        Self {
            finish_reason: FinishReason::Unknown,
            usage: Usage::UNKNOWN,
            is_first_chunk: true,
        }
    }
}

impl ReductionState {
    /// Unwrap a data frame, or turn a failure into an `error` part.
    fn accept<T>(
        &mut self,
        chunk: Result<QwenStreamFrame<T>, LlmError>,
    ) -> Result<T, StreamPart> {
        match chunk {
            Ok(QwenStreamFrame::Data(value)) => Ok(value),
            Ok(QwenStreamFrame::Error(payload)) => {
                self.finish_reason = FinishReason::Error;
                Err(StreamPart::Error {
                    error: api_error(payload),
                })
            }
            Err(error) => {
                self.finish_reason = FinishReason::Error;
                Err(StreamPart::Error { error })
            }
        }
    }

    /// Response metadata on the first successful chunk only.
    fn start(
        &mut self,
        id: Option<&str>,
        created: Option<i64>,
        model: Option<&str>,
    ) -> Option<StreamPart> {
        if !self.is_first_chunk {
            return None;
        }
        self.is_first_chunk = false;
        Some(StreamPart::ResponseMetadata(get_response_metadata(
            id, created, model,
        )))
    }

    fn finish_part(&self) -> StreamPart {
        StreamPart::Finish {
            finish_reason: self.finish_reason,
            usage: self.usage,
        }
    }
}

fn api_error(payload: QwenErrorResponse) -> LlmError {
    let data = payload.into_data();
    warn!(target: "siumai::qwen", message = %data.message, "error payload in stream");
    data.into_llm_error()
}

/// Reducer for `/completions` streams
#[derive(Debug, Default)]
pub struct CompletionStreamReducer {
    state: ReductionState,
}

impl CompletionStreamReducer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamReducer for CompletionStreamReducer {
    type Chunk = QwenCompletionChunk;

    fn reduce(&mut self, chunk: Result<Self::Chunk, LlmError>) -> Vec<StreamPart> {
        let value = match self.state.accept(chunk) {
            Ok(value) => value,
            Err(part) => return vec![part],
        };

        let mut parts = Vec::with_capacity(2);
        parts.extend(self.state.start(
            value.id.as_deref(),
            value.created,
            value.model.as_deref(),
        ));

        if let Some(usage) = value.usage.filter(QwenUsage::is_reported) {
            self.state.usage = usage.into();
        }

        if let Some(choice) = value.choices.into_iter().next() {
            if choice.finish_reason.is_some() {
                self.state.finish_reason = map_qwen_finish_reason(choice.finish_reason.as_deref());
            }
            parts.push(StreamPart::TextDelta {
                text_delta: choice.text,
            });
        }

        parts
    }

    fn finish(&mut self) -> Vec<StreamPart> {
        vec![self.state.finish_part()]
    }
}

/// Tool call being assembled from deltas
#[derive(Debug)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
    finished: bool,
}

impl PendingToolCall {
    fn to_tool_call(&self) -> ToolCall {
        ToolCall {
            tool_call_type: ToolCallType::Function,
            tool_call_id: self.id.clone(),
            tool_name: self.name.clone(),
            args: self.arguments.clone(),
        }
    }
}

fn is_parsable_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Reducer for `/chat/completions` streams
#[derive(Debug, Default)]
pub struct ChatStreamReducer {
    state: ReductionState,
    /// Pending calls keyed by the backend's tool call index
    tool_calls: BTreeMap<usize, PendingToolCall>,
}

impl ChatStreamReducer {
    pub fn new() -> Self {
        Self::default()
    }

    fn reduce_tool_call(&mut self, delta: QwenToolCallDelta, parts: &mut Vec<StreamPart>) {
        let index = delta.index;
        let function = delta.function.unwrap_or_default();

        let pending = match self.tool_calls.entry(index) {
            Entry::Occupied(entry) => {
                let pending = entry.into_mut();
                if pending.finished {
                    return;
                }
                if let Some(arguments) = function.arguments {
                    pending.arguments.push_str(&arguments);
                    parts.push(StreamPart::ToolCallDelta {
                        tool_call_type: ToolCallType::Function,
                        tool_call_id: pending.id.clone(),
                        tool_name: pending.name.clone(),
                        args_text_delta: arguments,
                    });
                }
                pending
            }
            Entry::Vacant(entry) => {
                let Some(name) = function.name else {
                    self.state.finish_reason = FinishReason::Error;
                    parts.push(StreamPart::Error {
                        error: LlmError::ParseError(format!(
                            "Tool call delta at index {index} has no function name"
                        )),
                    });
                    return;
                };
                let arguments = function.arguments.unwrap_or_default();
                let pending = entry.insert(PendingToolCall {
                    id: delta
                        .id
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    name,
                    arguments,
                    finished: false,
                });
                if !pending.arguments.is_empty() {
                    parts.push(StreamPart::ToolCallDelta {
                        tool_call_type: ToolCallType::Function,
                        tool_call_id: pending.id.clone(),
                        tool_name: pending.name.clone(),
                        args_text_delta: pending.arguments.clone(),
                    });
                }
                pending
            }
        };

        if is_parsable_json(&pending.arguments) {
            pending.finished = true;
            parts.push(StreamPart::ToolCall(pending.to_tool_call()));
        }
    }

    fn reduce_data(&mut self, value: QwenChatChunkData) -> Vec<StreamPart> {
        let mut parts = Vec::with_capacity(2);
        parts.extend(self.state.start(
            value.id.as_deref(),
            value.created,
            value.model.as_deref(),
        ));

        if let Some(usage) = value.usage.filter(QwenUsage::is_reported) {
            self.state.usage = usage.into();
        }

        let Some(choice) = value.choices.into_iter().next() else {
            return parts;
        };
        if choice.finish_reason.is_some() {
            self.state.finish_reason = map_qwen_finish_reason(choice.finish_reason.as_deref());
        }
        let Some(delta) = choice.delta else {
            return parts;
        };

        if let Some(reasoning) = delta.reasoning_content {
            parts.push(StreamPart::ReasoningDelta {
                text_delta: reasoning,
            });
        }
        if let Some(content) = delta.content {
            parts.push(StreamPart::TextDelta {
                text_delta: content,
            });
        }
        for tool_call in delta.tool_calls.unwrap_or_default() {
            self.reduce_tool_call(tool_call, &mut parts);
        }

        parts
    }
}

impl StreamReducer for ChatStreamReducer {
    type Chunk = QwenChatChunk;

    fn reduce(&mut self, chunk: Result<Self::Chunk, LlmError>) -> Vec<StreamPart> {
        match self.state.accept(chunk) {
            Ok(value) => self.reduce_data(value),
            Err(part) => vec![part],
        }
    }

    fn finish(&mut self) -> Vec<StreamPart> {
        let mut parts: Vec<StreamPart> = self
            .tool_calls
            .values()
            .filter(|pending| !pending.finished)
            .map(|pending| StreamPart::ToolCall(pending.to_tool_call()))
            .collect();
        parts.push(self.state.finish_part());
        parts
    }
}
