//! Qwen chat model (`/chat/completions`)

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::config::QwenModelConfig;
use super::convert::convert_to_qwen_chat_messages;
use super::errors::classify_qwen_http_error;
use super::settings::QwenChatSettings;
use super::streaming::ChatStreamReducer;
use super::types::QwenChatResponse;
use super::utils::{
    get_response_metadata, insert_if_some, map_qwen_finish_reason, merge_provider_options,
};
use crate::error::LlmError;
use crate::traits::LanguageModel;
use crate::types::{
    CallOptions, CallWarning, FunctionTool, GenerateResult, ModelMode, RawCall, ResponseFormat,
    StreamResult, Tool, ToolCall, ToolCallType, ToolChoice, Usage,
};
use crate::utils::http::{JsonResponse, post_json_to_api, post_to_api};
use crate::utils::{StreamFactory, extract_response_headers};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Chat model. Object generation defaults to a forced tool call.
#[derive(Debug, Clone)]
pub struct QwenChatLanguageModel {
    model_id: String,
    settings: QwenChatSettings,
    config: QwenModelConfig,
}

fn function_tool_json(tool: &FunctionTool) -> Value {
    let mut function = Map::new();
    function.insert("name".to_string(), json!(tool.name));
    insert_if_some(&mut function, "description", tool.description.as_deref());
    function.insert("parameters".to_string(), tool.parameters.clone());
    json!({ "type": "function", "function": function })
}

/// Wire `tools` and `tool_choice` for regular mode, plus warnings for tools
/// the endpoint cannot run.
fn prepare_tools(
    tools: Option<&Vec<Tool>>,
    tool_choice: Option<&ToolChoice>,
) -> (Option<Value>, Option<Value>, Vec<CallWarning>) {
    let Some(tools) = tools.filter(|tools| !tools.is_empty()) else {
        return (None, None, Vec::new());
    };

    let mut warnings = Vec::new();
    let mut wire_tools = Vec::with_capacity(tools.len());
    for tool in tools {
        match tool {
            Tool::Function(function) => wire_tools.push(function_tool_json(function)),
            Tool::ProviderDefined { .. } => warnings.push(CallWarning::UnsupportedTool {
                tool: tool.clone(),
                details: None,
            }),
        }
    }

    let tool_choice = tool_choice.map(|choice| match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Required => json!("required"),
        ToolChoice::Tool { tool_name } => {
            json!({ "type": "function", "function": { "name": tool_name } })
        }
    });

    (Some(Value::Array(wire_tools)), tool_choice, warnings)
}

impl QwenChatLanguageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: QwenChatSettings,
        config: QwenModelConfig,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
        }
    }

    pub fn settings(&self) -> &QwenChatSettings {
        &self.settings
    }

    fn get_args(
        &self,
        options: &CallOptions,
    ) -> Result<(Map<String, Value>, Vec<CallWarning>), LlmError> {
        let mut warnings = Vec::new();

        if options.top_k.is_some() {
            warnings.push(CallWarning::unsupported_setting("topK", None));
        }

        if let Some(ResponseFormat::Json {
            schema: Some(_), ..
        }) = &options.response_format
        {
            warnings.push(CallWarning::unsupported_setting(
                "responseFormat",
                Some("JSON response format schema is not supported."),
            ));
        }

        let messages = convert_to_qwen_chat_messages(&options.prompt)?;

        let mut args = Map::new();
        args.insert("model".to_string(), json!(self.model_id));
        insert_if_some(&mut args, "user", self.settings.user.as_deref());
        insert_if_some(&mut args, "max_tokens", options.max_tokens);
        insert_if_some(&mut args, "temperature", options.temperature);
        insert_if_some(&mut args, "top_p", options.top_p);
        insert_if_some(&mut args, "frequency_penalty", options.frequency_penalty);
        insert_if_some(&mut args, "presence_penalty", options.presence_penalty);
        if matches!(options.response_format, Some(ResponseFormat::Json { .. })) {
            args.insert(
                "response_format".to_string(),
                json!({ "type": "json_object" }),
            );
        }
        insert_if_some(&mut args, "stop", options.stop_sequences.as_ref());
        insert_if_some(&mut args, "seed", options.seed);
        merge_provider_options(
            &mut args,
            options.provider_metadata.as_ref(),
            self.config.provider_options_name(),
        );
        args.insert("messages".to_string(), serde_json::to_value(&messages)?);

        match &options.mode {
            ModelMode::Regular { tools, tool_choice } => {
                let (tools, tool_choice, tool_warnings) =
                    prepare_tools(tools.as_ref(), tool_choice.as_ref());
                insert_if_some(&mut args, "tools", tools);
                insert_if_some(&mut args, "tool_choice", tool_choice);
                warnings.extend(tool_warnings);
            }
            ModelMode::ObjectJson { .. } => {
                args.insert(
                    "response_format".to_string(),
                    json!({ "type": "json_object" }),
                );
            }
            ModelMode::ObjectTool { tool } => {
                args.insert(
                    "tool_choice".to_string(),
                    json!({ "type": "function", "function": { "name": tool.name } }),
                );
                args.insert("tools".to_string(), json!([function_tool_json(tool)]));
            }
        }

        Ok((args, warnings))
    }
}

#[async_trait]
impl LanguageModel for QwenChatLanguageModel {
    fn provider(&self) -> &str {
        &self.config.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, LlmError> {
        let (args, warnings) = self.get_args(&options)?;
        let body = Value::Object(args.clone());
        let request_body = serde_json::to_string(&body)?;
        let headers = self.config.headers(&options.headers)?;

        let JsonResponse {
            value: response,
            headers: raw_response_headers,
        } = post_json_to_api::<QwenChatResponse>(
            self.config.http_client(),
            &self.config.url(CHAT_COMPLETIONS_PATH),
            headers,
            &body,
            classify_qwen_http_error,
        )
        .await?;

        let metadata = get_response_metadata(
            response.id.as_deref(),
            response.created,
            response.model.as_deref(),
        );
        let usage = response.usage.map(Usage::from).unwrap_or(Usage::UNKNOWN);
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError("Chat response has no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                tool_call_type: ToolCallType::Function,
                tool_call_id: call
                    .id
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                tool_name: call.function.name,
                args: call.function.arguments,
            })
            .collect();

        Ok(GenerateResult {
            text: choice.message.content,
            reasoning: choice.message.reasoning_content,
            tool_calls,
            finish_reason: map_qwen_finish_reason(choice.finish_reason.as_deref()),
            usage,
            raw_call: RawCall::from_args(&args, "messages"),
            raw_response_headers,
            response: metadata,
            warnings,
            request_body,
        })
    }

    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, LlmError> {
        let (args, warnings) = self.get_args(&options)?;
        let mut body = args.clone();
        body.insert("stream".to_string(), Value::Bool(true));
        let body = Value::Object(body);
        let request_body = serde_json::to_string(&body)?;
        let headers = self.config.headers(&options.headers)?;

        let response = post_to_api(
            self.config.http_client(),
            &self.config.url(CHAT_COMPLETIONS_PATH),
            headers,
            &body,
            classify_qwen_http_error,
        )
        .await?;
        let raw_response_headers = extract_response_headers(response.headers());

        Ok(StreamResult {
            stream: StreamFactory::create_eventsource_stream(response, ChatStreamReducer::new()),
            raw_call: RawCall::from_args(&args, "messages"),
            raw_response_headers,
            warnings,
            request_body,
        })
    }
}
