//! Chat model against a mock `/chat/completions` endpoint

mod support;

use serde_json::json;
use siumai_provider_qwen::prelude::*;
use support::mockito::{self as mock, Matcher};

const CHAT_PATH: &str = "/chat/completions";

fn chat_body(message: serde_json::Value, finish_reason: &str) -> String {
    json!({
        "id": "chatcmpl-95ZTZkhr0mHNKqerQfiwkuox3PHAd",
        "object": "chat.completion",
        "created": 1711115037,
        "model": "qwen-plus",
        "choices": [{ "index": 0, "message": message, "finish_reason": finish_reason }],
        "usage": { "prompt_tokens": 4, "total_tokens": 34, "completion_tokens": 30 }
    })
    .to_string()
}

#[tokio::test]
async fn generate_sends_converted_messages() {
    let mut server = mock::start().await;
    let m = server
        .mock("POST", CHAT_PATH)
        .match_body(Matcher::Json(json!({
            "model": "qwen-plus",
            "messages": [
                { "role": "system", "content": "Be terse." },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "What is this?" },
                        { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAECAw==" } }
                    ]
                }
            ]
        })))
        .with_status(200)
        .with_body(chat_body(json!({ "role": "assistant", "content": "A pixel." }), "stop"))
        .create_async()
        .await;

    let result = support::qwen(&server)
        .chat_model(models::QWEN_PLUS, Default::default())
        .do_generate(CallOptions::new(vec![
            ChatMessage::system("Be terse."),
            ChatMessage::user(vec![
                ContentPart::text("What is this?"),
                ContentPart::image_binary(vec![0, 1, 2, 3], Some("image/png".into())),
            ]),
        ]))
        .await
        .unwrap();

    m.assert_async().await;
    assert_eq!(result.text.as_deref(), Some("A pixel."));
    assert_eq!(result.usage, Usage::new(4, 30));
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.raw_call.raw_prompt[0]["role"], json!("system"));
    assert!(!result.raw_call.raw_settings.contains_key("messages"));
}

#[tokio::test]
async fn generate_extracts_reasoning_and_tool_calls() {
    let mut server = mock::start().await;
    let _m = mock::json_mock(
        &mut server,
        CHAT_PATH,
        200,
        &chat_body(
            json!({
                "role": "assistant",
                "content": null,
                "reasoning_content": "Need the weather tool.",
                "tool_calls": [
                    { "id": "call_1", "type": "function", "function": { "name": "weather", "arguments": "{\"city\":\"Paris\"}" } },
                    { "type": "function", "function": { "name": "time", "arguments": "{}" } }
                ]
            }),
            "tool_calls",
        ),
    )
    .await;

    let result = support::qwen(&server)
        .chat_model("qwen-plus", Default::default())
        .do_generate(support::hello_options().with_mode(ModelMode::Regular {
            tools: Some(vec![Tool::function("weather", None, json!({ "type": "object" }))]),
            tool_choice: Some(ToolChoice::Auto),
        }))
        .await
        .unwrap();

    assert_eq!(result.text, None);
    assert_eq!(result.reasoning.as_deref(), Some("Need the weather tool."));
    assert_eq!(result.finish_reason, FinishReason::ToolCalls);
    assert_eq!(result.tool_calls.len(), 2);
    assert_eq!(result.tool_calls[0].tool_call_id, "call_1");
    assert_eq!(result.tool_calls[0].args, "{\"city\":\"Paris\"}");
    assert_eq!(result.tool_calls[1].tool_name, "time");
    assert!(!result.tool_calls[1].tool_call_id.is_empty());
}

#[tokio::test]
async fn generate_rejects_file_parts_before_sending() {
    let mut server = mock::start().await;
    let m = server.mock("POST", CHAT_PATH).expect(0).create_async().await;

    let err = support::qwen(&server)
        .chat_model("qwen-plus", Default::default())
        .do_generate(CallOptions::new(vec![ChatMessage::user(vec![
            ContentPart::file_binary(vec![1, 2], "application/pdf"),
        ])]))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::UnsupportedContentPart(_)));
    m.assert_async().await;
}

#[tokio::test]
async fn stream_emits_text_reasoning_and_usage() {
    let mut server = mock::start().await;
    let chunks = [
        r#"data: {"id":"chatcmpl-1","object":"chat.completion.chunk","created":1711357598,"model":"qwen-plus","choices":[{"index":0,"delta":{"role":"assistant","reasoning_content":"Hmm"},"finish_reason":null}]}"#,
        r#"data: {"id":"chatcmpl-1","object":"chat.completion.chunk","created":1711357598,"model":"qwen-plus","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
        r#"data: {"id":"chatcmpl-1","object":"chat.completion.chunk","created":1711357598,"model":"qwen-plus","choices":[{"index":0,"delta":{"content":"!"},"finish_reason":"stop"}]}"#,
        r#"data: {"id":"chatcmpl-1","object":"chat.completion.chunk","created":1711357598,"model":"qwen-plus","choices":[],"usage":{"prompt_tokens":18,"completion_tokens":439,"total_tokens":457}}"#,
        "data: [DONE]",
    ]
    .iter()
    .map(|line| format!("{line}\n\n"))
    .collect::<Vec<_>>();
    let m = server
        .mock("POST", CHAT_PATH)
        .match_body(Matcher::PartialJson(json!({ "stream": true, "model": "qwen-plus" })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(chunks.concat())
        .create_async()
        .await;

    let result = support::qwen(&server)
        .chat_model("qwen-plus", Default::default())
        .do_stream(support::hello_options())
        .await
        .unwrap();
    assert_eq!(
        result.request_body,
        r#"{"model":"qwen-plus","messages":[{"role":"user","content":"Hello"}],"stream":true}"#
    );
    let parts = support::collect(result.stream).await;
    m.assert_async().await;

    assert!(matches!(parts[0], StreamPart::ResponseMetadata(_)));
    assert_eq!(
        &parts[1..],
        &[
            StreamPart::ReasoningDelta { text_delta: "Hmm".into() },
            StreamPart::TextDelta { text_delta: "Hello".into() },
            StreamPart::TextDelta { text_delta: "!".into() },
            StreamPart::Finish {
                finish_reason: FinishReason::Stop,
                usage: Usage::new(18, 439),
            },
        ]
    );
}

#[tokio::test]
async fn stream_http_error_is_returned_before_streaming() {
    let mut server = mock::start().await;
    let _m = mock::json_mock(
        &mut server,
        CHAT_PATH,
        429,
        r#"{"error":{"message":"Requests rate limit exceeded","type":"requests","code":"Throttling"}}"#,
    )
    .await;

    let err = support::qwen(&server)
        .chat_model("qwen-plus", Default::default())
        .do_stream(support::hello_options())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LlmError::ApiError { code: 429, ref message, .. } if message == "Requests rate limit exceeded"
    ));
}
