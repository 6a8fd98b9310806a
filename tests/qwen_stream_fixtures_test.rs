//! Recorded chat streams reduced without HTTP

mod support;

use siumai_provider_qwen::prelude::*;
use siumai_provider_qwen::providers::qwen::ChatStreamReducer;
use support::stream_fixture::reduce_fixture;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/qwen");

#[tokio::test]
async fn tool_call_stream_is_assembled() {
    let parts = reduce_fixture(
        &format!("{FIXTURES}/chat_tool_call_stream.sse"),
        ChatStreamReducer::new(),
    )
    .await;

    match &parts[0] {
        StreamPart::ResponseMetadata(metadata) => {
            assert_eq!(metadata.id.as_deref(), Some("chatcmpl-7d1a"));
            assert_eq!(metadata.model_id.as_deref(), Some("qwen-plus"));
        }
        other => panic!("expected response metadata, got {other:?}"),
    }
    assert_eq!(
        &parts[1..],
        &[
            StreamPart::TextDelta { text_delta: String::new() },
            StreamPart::ToolCallDelta {
                tool_call_type: ToolCallType::Function,
                tool_call_id: "call_f3a".into(),
                tool_name: "get_weather".into(),
                args_text_delta: "{\"location\": ".into(),
            },
            StreamPart::ToolCallDelta {
                tool_call_type: ToolCallType::Function,
                tool_call_id: "call_f3a".into(),
                tool_name: "get_weather".into(),
                args_text_delta: "\"Hangzhou\"}".into(),
            },
            StreamPart::ToolCall(ToolCall {
                tool_call_type: ToolCallType::Function,
                tool_call_id: "call_f3a".into(),
                tool_name: "get_weather".into(),
                args: "{\"location\": \"Hangzhou\"}".into(),
            }),
            StreamPart::Finish {
                finish_reason: FinishReason::ToolCalls,
                usage: Usage::new(210, 22),
            },
        ]
    );
}

#[tokio::test]
async fn error_payload_mid_stream_marks_finish_as_error() {
    let parts = reduce_fixture(
        &format!("{FIXTURES}/chat_error_stream.sse"),
        ChatStreamReducer::new(),
    )
    .await;

    assert_eq!(parts.len(), 4);
    assert_eq!(
        parts[1],
        StreamPart::TextDelta { text_delta: "Partial".into() }
    );
    assert_eq!(
        parts[2],
        StreamPart::Error {
            error: LlmError::ProviderError {
                provider: "qwen".into(),
                message: "Output data may contain inappropriate content.".into(),
                error_code: Some("data_inspection_failed".into()),
            }
        }
    );
    assert_eq!(
        parts[3],
        StreamPart::Finish {
            finish_reason: FinishReason::Error,
            usage: Usage::UNKNOWN,
        }
    );
}
