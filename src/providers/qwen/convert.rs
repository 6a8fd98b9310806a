//! Prompt conversion for the chat and completion endpoints.
//!
//! Provider metadata stored under the `qwen` key is spread onto the wire object
//! it belongs to. Keys the converter sets itself always win over metadata.

use serde_json::{Map, Value};
use tracing::error;

use super::types::{
    QwenAssistantMessage, QwenContentPart, QwenFunctionCall, QwenImagePart, QwenImageUrl,
    QwenMessage, QwenSystemMessage, QwenTextPart, QwenToolCall, QwenToolMessage,
    QwenUserContent, QwenUserMessage,
};
use crate::error::LlmError;
use crate::types::{ChatMessage, ContentPart, InputFormat, MediaSource, extract_provider_metadata};

/// Key of this provider's bag in a provider metadata map
pub const QWEN_PROVIDER_KEY: &str = "qwen";

const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

const SYSTEM_KEYS: &[&str] = &["role", "content"];
const USER_KEYS: &[&str] = &["role", "content"];
const ASSISTANT_KEYS: &[&str] = &["role", "content", "tool_calls"];
const TOOL_KEYS: &[&str] = &["role", "tool_call_id", "content"];
const TEXT_PART_KEYS: &[&str] = &["type", "text"];
const IMAGE_PART_KEYS: &[&str] = &["type", "image_url"];
const TOOL_CALL_KEYS: &[&str] = &["id", "type", "function"];

/// Resolve the `qwen` bag of `item`, minus keys owned by the wire object.
fn extra_for<T>(item: &T, structural: &[&str]) -> Map<String, Value>
where
    T: crate::types::HasProviderMetadata,
{
    let mut extra = extract_provider_metadata(Some(item), QWEN_PROVIDER_KEY);
    extra.retain(|key, _| !structural.contains(&key.as_str()));
    extra
}

/// Convert a generic prompt into Qwen chat messages.
///
/// Tool messages expand to one wire message per tool result. Fails without
/// partial output when a user message holds a part the API cannot carry.
pub fn convert_to_qwen_chat_messages(prompt: &[ChatMessage]) -> Result<Vec<QwenMessage>, LlmError> {
    let mut messages = Vec::with_capacity(prompt.len());

    for message in prompt {
        match message {
            ChatMessage::System { content, .. } => {
                messages.push(QwenMessage::System(QwenSystemMessage {
                    content: content.clone(),
                    extra: extra_for(message, SYSTEM_KEYS),
                }));
            }
            ChatMessage::User { content, .. } => {
                messages.push(convert_user_message(message, content)?);
            }
            ChatMessage::Assistant { content, .. } => {
                messages.push(convert_assistant_message(message, content)?);
            }
            ChatMessage::Tool { content, .. } => {
                // Only part-level metadata applies to tool messages.
                for part in content {
                    let ContentPart::ToolResult {
                        tool_call_id,
                        result,
                        ..
                    } = part
                    else {
                        error!(target: "siumai::qwen", kind = part.kind(), "non tool-result part in tool message");
                        return Err(LlmError::InternalError(format!(
                            "Unexpected {} part in tool message",
                            part.kind()
                        )));
                    };
                    messages.push(QwenMessage::Tool(QwenToolMessage {
                        tool_call_id: tool_call_id.clone(),
                        content: result.to_string(),
                        extra: extra_for(part, TOOL_KEYS),
                    }));
                }
            }
        }
    }

    Ok(messages)
}

fn convert_user_message(
    message: &ChatMessage,
    content: &[ContentPart],
) -> Result<QwenMessage, LlmError> {
    // A lone text part is flattened into string content carrying the part's bag.
    if let [part @ ContentPart::Text { text, .. }] = content {
        return Ok(QwenMessage::User(QwenUserMessage {
            content: QwenUserContent::Text(text.clone()),
            extra: extra_for(part, USER_KEYS),
        }));
    }

    let parts = content
        .iter()
        .map(convert_user_part)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QwenMessage::User(QwenUserMessage {
        content: QwenUserContent::Parts(parts),
        extra: extra_for(message, USER_KEYS),
    }))
}

fn convert_user_part(part: &ContentPart) -> Result<QwenContentPart, LlmError> {
    match part {
        ContentPart::Text { text, .. } => Ok(QwenContentPart::Text(QwenTextPart {
            text: text.clone(),
            extra: extra_for(part, TEXT_PART_KEYS),
        })),
        ContentPart::Image {
            image, mime_type, ..
        } => Ok(QwenContentPart::ImageUrl(QwenImagePart {
            image_url: QwenImageUrl {
                url: image_url(image, mime_type.as_deref()),
            },
            extra: extra_for(part, IMAGE_PART_KEYS),
        })),
        other => Err(LlmError::UnsupportedContentPart(format!(
            "{} parts in user messages",
            other.kind()
        ))),
    }
}

/// URL sources pass through; inline data becomes a base64 data URL.
fn image_url(image: &MediaSource, mime_type: Option<&str>) -> String {
    match image.as_url() {
        Some(url) => url.to_string(),
        None => format!(
            "data:{};base64,{}",
            mime_type.unwrap_or(DEFAULT_IMAGE_MIME_TYPE),
            image.as_base64().unwrap_or_default()
        ),
    }
}

fn convert_assistant_message(
    message: &ChatMessage,
    content: &[ContentPart],
) -> Result<QwenMessage, LlmError> {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in content {
        match part {
            ContentPart::Text { text: delta, .. } => text.push_str(delta),
            ContentPart::ToolCall {
                tool_call_id,
                tool_name,
                args,
                ..
            } => tool_calls.push(QwenToolCall {
                id: tool_call_id.clone(),
                call_type: "function".to_string(),
                function: QwenFunctionCall {
                    name: tool_name.clone(),
                    arguments: args.to_string(),
                },
                extra: extra_for(part, TOOL_CALL_KEYS),
            }),
            other => {
                error!(target: "siumai::qwen", kind = other.kind(), "unexpected part in assistant message");
                return Err(LlmError::InternalError(format!(
                    "Unexpected {} part in assistant message",
                    other.kind()
                )));
            }
        }
    }

    Ok(QwenMessage::Assistant(QwenAssistantMessage {
        content: text,
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        extra: extra_for(message, ASSISTANT_KEYS),
    }))
}

const USER_LABEL: &str = "user";
const ASSISTANT_LABEL: &str = "assistant";

/// Completion prompt text plus the stop sequences that end the assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub struct QwenCompletionPrompt {
    pub prompt: String,
    pub stop_sequences: Option<Vec<String>>,
}

/// Render a generic prompt as plain completion text.
///
/// A single user text in prompt form is sent verbatim. Anything else becomes a
/// `user:` / `assistant:` transcript ending with an open assistant turn.
pub fn convert_to_qwen_completion_prompt(
    prompt: &[ChatMessage],
    input_format: InputFormat,
) -> Result<QwenCompletionPrompt, LlmError> {
    if input_format == InputFormat::Prompt
        && let [ChatMessage::User { content, .. }] = prompt
        && let [ContentPart::Text { text, .. }] = content.as_slice()
    {
        return Ok(QwenCompletionPrompt {
            prompt: text.clone(),
            stop_sequences: None,
        });
    }

    let mut text = String::new();
    let mut messages = prompt;

    if let [ChatMessage::System { content, .. }, rest @ ..] = messages {
        text.push_str(content);
        text.push_str("\n\n");
        messages = rest;
    }

    for message in messages {
        match message {
            ChatMessage::System { content, .. } => {
                return Err(LlmError::InvalidPrompt(format!(
                    "Unexpected system message in prompt: {content}"
                )));
            }
            ChatMessage::User { content, .. } => {
                let mut user_message = String::new();
                for part in content {
                    match part {
                        ContentPart::Text { text, .. } => user_message.push_str(text),
                        ContentPart::Image { .. } => {
                            return Err(LlmError::UnsupportedFunctionality("images".to_string()));
                        }
                        other => {
                            return Err(LlmError::UnsupportedFunctionality(format!(
                                "{} parts in completion prompts",
                                other.kind()
                            )));
                        }
                    }
                }
                text.push_str(&format!("{USER_LABEL}:\n{user_message}\n\n"));
            }
            ChatMessage::Assistant { content, .. } => {
                let mut assistant_message = String::new();
                for part in content {
                    match part {
                        ContentPart::Text { text, .. } => assistant_message.push_str(text),
                        ContentPart::ToolCall { .. } => {
                            return Err(LlmError::UnsupportedFunctionality(
                                "tool-call messages".to_string(),
                            ));
                        }
                        other => {
                            return Err(LlmError::UnsupportedFunctionality(format!(
                                "{} parts in completion prompts",
                                other.kind()
                            )));
                        }
                    }
                }
                text.push_str(&format!("{ASSISTANT_LABEL}:\n{assistant_message}\n\n"));
            }
            ChatMessage::Tool { .. } => {
                return Err(LlmError::UnsupportedFunctionality(
                    "tool messages".to_string(),
                ));
            }
        }
    }

    text.push_str(&format!("{ASSISTANT_LABEL}:\n"));

    Ok(QwenCompletionPrompt {
        prompt: text,
        stop_sequences: Some(vec![format!("\n{USER_LABEL}:")]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(messages: &[QwenMessage]) -> Value {
        serde_json::to_value(messages).unwrap()
    }

    #[test]
    fn single_text_part_becomes_string_content() {
        let result =
            convert_to_qwen_chat_messages(&[ChatMessage::user(vec![ContentPart::text("Hi")])])
                .unwrap();
        assert_eq!(to_json(&result), json!([{ "role": "user", "content": "Hi" }]));
    }

    #[test]
    fn binary_images_become_data_urls() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::user(vec![
            ContentPart::text("Hello"),
            ContentPart::image_binary(vec![0, 1, 2, 3], Some("image/png".into())),
        ])])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([{
                "role": "user",
                "content": [
                    { "type": "text", "text": "Hello" },
                    { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAECAw==" } }
                ]
            }])
        );
    }

    #[test]
    fn binary_images_default_to_jpeg_and_urls_pass_through() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::user(vec![
            ContentPart::image_binary(vec![9, 8, 7, 6], None),
            ContentPart::image_url("https://example.com/image.jpg"),
        ])])
        .unwrap();
        assert_eq!(
            to_json(&result)[0]["content"],
            json!([
                { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,CQgHBg==" } },
                { "type": "image_url", "image_url": { "url": "https://example.com/image.jpg" } }
            ])
        );
    }

    #[test]
    fn file_parts_are_rejected() {
        let err = convert_to_qwen_chat_messages(&[
            ChatMessage::system("ok"),
            ChatMessage::user(vec![ContentPart::file_binary(vec![1], "application/pdf")]),
        ])
        .unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedContentPart(_)));
    }

    #[test]
    fn tool_calls_are_stringified_with_text_concatenated() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::assistant(vec![
            ContentPart::text("Checking that now..."),
            ContentPart::tool_call("call1", "searchTool", json!({ "query": "Weather" }))
                .with_provider_metadata("qwen", json!({ "function_call_reason": "user request" })),
            ContentPart::text("Almost there..."),
            ContentPart::tool_call("call2", "mapsTool", json!({ "location": "Paris" })),
        ])])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([{
                "role": "assistant",
                "content": "Checking that now...Almost there...",
                "tool_calls": [
                    {
                        "id": "call1",
                        "type": "function",
                        "function": { "name": "searchTool", "arguments": "{\"query\":\"Weather\"}" },
                        "function_call_reason": "user request"
                    },
                    {
                        "id": "call2",
                        "type": "function",
                        "function": { "name": "mapsTool", "arguments": "{\"location\":\"Paris\"}" }
                    }
                ]
            }])
        );
    }

    #[test]
    fn assistant_without_parts_has_empty_content_and_no_tool_calls() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::assistant(vec![])]).unwrap();
        assert_eq!(to_json(&result), json!([{ "role": "assistant", "content": "" }]));
    }

    #[test]
    fn assistant_image_part_is_an_internal_error() {
        let err = convert_to_qwen_chat_messages(&[ChatMessage::assistant(vec![
            ContentPart::image_url("https://example.com/a.png"),
        ])])
        .unwrap_err();
        assert!(matches!(err, LlmError::InternalError(_)));
    }

    #[test]
    fn tool_message_expands_per_result_and_ignores_message_bag() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::tool(vec![
            ContentPart::tool_result("call123", "calculator", json!({ "stepOne": "data chunk 1" })),
            ContentPart::tool_result("call123", "calculator", json!({ "stepTwo": "data chunk 2" }))
                .with_provider_metadata("qwen", json!({ "partial": true })),
        ])
        .with_provider_metadata("qwen", json!({ "responseTier": "detailed" }))])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([
                { "role": "tool", "tool_call_id": "call123", "content": "{\"stepOne\":\"data chunk 1\"}" },
                { "role": "tool", "tool_call_id": "call123", "content": "{\"stepTwo\":\"data chunk 2\"}", "partial": true }
            ])
        );
    }

    #[test]
    fn tool_message_with_text_part_is_an_internal_error() {
        let err = convert_to_qwen_chat_messages(&[ChatMessage::tool(vec![ContentPart::text("x")])])
            .unwrap_err();
        assert!(matches!(err, LlmError::InternalError(_)));
    }

    #[test]
    fn system_metadata_is_merged_and_foreign_metadata_omitted() {
        let result = convert_to_qwen_chat_messages(&[
            ChatMessage::system("You are a helpful assistant.")
                .with_provider_metadata("qwen", json!({ "cacheControl": { "type": "ephemeral" } })),
            ChatMessage::system("Hello")
                .with_provider_metadata("someOtherProvider", json!({ "shouldBeIgnored": true })),
        ])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([
                {
                    "role": "system",
                    "content": "You are a helpful assistant.",
                    "cacheControl": { "type": "ephemeral" }
                },
                { "role": "system", "content": "Hello" }
            ])
        );
    }

    #[test]
    fn flattened_user_text_uses_only_the_part_bag() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::user(vec![
            ContentPart::text("Hello").with_provider_metadata("qwen", json!({ "contentLevel": true })),
        ])
        .with_provider_metadata("qwen", json!({ "messageLevel": true }))])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([{ "role": "user", "content": "Hello", "contentLevel": true }])
        );
    }

    #[test]
    fn message_and_part_bags_apply_to_their_own_objects() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::user(vec![
            ContentPart::text("Part A")
                .with_provider_metadata("qwen", json!({ "textPartLevel": "localized" }))
                .with_provider_metadata("leftoverForText", json!({ "info": "text leftover" })),
            ContentPart::image_binary(vec![9, 8, 7, 6], Some("image/png".into()))
                .with_provider_metadata("qwen", json!({ "imagePartLevel": "image-data" })),
        ])
        .with_provider_metadata("qwen", json!({ "messageLevel": "global-metadata" }))
        .with_provider_metadata("leftoverForMessage", json!({ "x": 123 }))])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([{
                "role": "user",
                "content": [
                    { "type": "text", "text": "Part A", "textPartLevel": "localized" },
                    {
                        "type": "image_url",
                        "image_url": { "url": "data:image/png;base64,CQgHBg==" },
                        "imagePartLevel": "image-data"
                    }
                ],
                "messageLevel": "global-metadata"
            }])
        );
    }

    #[test]
    fn tool_call_and_message_bags_do_not_mix() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::assistant(vec![
            ContentPart::tool_call("collisionToolCall", "collider", json!({ "num": 42 }))
                .with_provider_metadata(
                    "qwen",
                    json!({ "cacheControl": { "type": "ephemeral" }, "sharedKey": "toolLevel" }),
                ),
        ])
        .with_provider_metadata(
            "qwen",
            json!({ "cacheControl": { "type": "default" }, "sharedKey": "assistantLevel" }),
        )])
        .unwrap();
        let message = &to_json(&result)[0];
        assert_eq!(message["cacheControl"], json!({ "type": "default" }));
        assert_eq!(message["sharedKey"], json!("assistantLevel"));
        assert_eq!(message["tool_calls"][0]["cacheControl"], json!({ "type": "ephemeral" }));
        assert_eq!(message["tool_calls"][0]["sharedKey"], json!("toolLevel"));
    }

    #[test]
    fn structural_fields_win_over_colliding_metadata() {
        let result = convert_to_qwen_chat_messages(&[
            ChatMessage::system("real").with_provider_metadata(
                "qwen",
                json!({ "content": "fake", "role": "user", "keep": 1 }),
            ),
            ChatMessage::assistant(vec![
                ContentPart::tool_call("id1", "t", json!({}))
                    .with_provider_metadata("qwen", json!({ "id": "other", "type": "x" })),
            ]),
        ])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([
                { "role": "system", "content": "real", "keep": 1 },
                {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{ "id": "id1", "type": "function", "function": { "name": "t", "arguments": "{}" } }]
                }
            ])
        );
    }

    #[test]
    fn user_part_fields_win_over_colliding_part_metadata() {
        let result = convert_to_qwen_chat_messages(&[ChatMessage::user(vec![
            ContentPart::text("A").with_provider_metadata(
                "qwen",
                json!({ "type": "image_url", "text": "fake", "k": 1 }),
            ),
            ContentPart::image_binary(vec![0, 1, 2, 3], Some("image/png".into()))
                .with_provider_metadata("qwen", json!({ "image_url": "x", "type": "text" })),
        ])])
        .unwrap();
        assert_eq!(
            to_json(&result),
            json!([{
                "role": "user",
                "content": [
                    { "type": "text", "text": "A", "k": 1 },
                    { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAECAw==" } }
                ]
            }])
        );
    }

    #[test]
    fn non_object_bags_are_ignored() {
        let result = convert_to_qwen_chat_messages(&[
            ChatMessage::system("s").with_provider_metadata("qwen", json!("not an object")),
        ])
        .unwrap();
        assert_eq!(to_json(&result), json!([{ "role": "system", "content": "s" }]));
    }

    #[test]
    fn completion_prompt_passes_single_user_text_verbatim() {
        let prompt = convert_to_qwen_completion_prompt(
            &[ChatMessage::user_text("Hello")],
            InputFormat::Prompt,
        )
        .unwrap();
        assert_eq!(prompt.prompt, "Hello");
        assert_eq!(prompt.stop_sequences, None);
    }

    #[test]
    fn completion_prompt_renders_transcript() {
        let prompt = convert_to_qwen_completion_prompt(
            &[
                ChatMessage::system("Be brief."),
                ChatMessage::user_text("Hi"),
                ChatMessage::assistant(vec![ContentPart::text("Hello!")]),
                ChatMessage::user(vec![ContentPart::text("How"), ContentPart::text(" are you?")]),
            ],
            InputFormat::Messages,
        )
        .unwrap();
        assert_eq!(
            prompt.prompt,
            "Be brief.\n\nuser:\nHi\n\nassistant:\nHello!\n\nuser:\nHow are you?\n\nassistant:\n"
        );
        assert_eq!(prompt.stop_sequences, Some(vec!["\nuser:".to_string()]));
    }

    #[test]
    fn completion_prompt_rejects_unsupported_content() {
        let late_system = convert_to_qwen_completion_prompt(
            &[ChatMessage::user_text("Hi"), ChatMessage::system("late")],
            InputFormat::Messages,
        );
        assert!(matches!(late_system, Err(LlmError::InvalidPrompt(_))));

        let image = convert_to_qwen_completion_prompt(
            &[ChatMessage::user(vec![ContentPart::image_url("https://x/y.png")])],
            InputFormat::Messages,
        );
        assert_eq!(
            image,
            Err(LlmError::UnsupportedFunctionality("images".into()))
        );

        let tool = convert_to_qwen_completion_prompt(
            &[ChatMessage::tool(vec![ContentPart::tool_result("c", "t", json!(1))])],
            InputFormat::Messages,
        );
        assert_eq!(
            tool,
            Err(LlmError::UnsupportedFunctionality("tool messages".into()))
        );
    }
}
