//! Qwen completion model (`/completions`)

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::config::QwenModelConfig;
use super::convert::convert_to_qwen_completion_prompt;
use super::errors::classify_qwen_http_error;
use super::settings::QwenCompletionSettings;
use super::streaming::CompletionStreamReducer;
use super::types::QwenCompletionResponse;
use super::utils::{
    get_response_metadata, insert_if_some, map_qwen_finish_reason, merge_provider_options,
};
use crate::error::LlmError;
use crate::traits::LanguageModel;
use crate::types::{
    CallOptions, CallWarning, GenerateResult, ModelMode, RawCall, ResponseFormat, StreamResult,
    Usage,
};
use crate::utils::http::{JsonResponse, post_json_to_api, post_to_api};
use crate::utils::{StreamFactory, extract_response_headers};

const COMPLETIONS_PATH: &str = "/completions";

/// Legacy text completion model. No tools and no object generation.
#[derive(Debug, Clone)]
pub struct QwenCompletionLanguageModel {
    model_id: String,
    settings: QwenCompletionSettings,
    config: QwenModelConfig,
}

impl QwenCompletionLanguageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: QwenCompletionSettings,
        config: QwenModelConfig,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
        }
    }

    pub fn settings(&self) -> &QwenCompletionSettings {
        &self.settings
    }

    /// Request args and warnings for `options`.
    fn get_args(
        &self,
        options: &CallOptions,
    ) -> Result<(Map<String, Value>, Vec<CallWarning>), LlmError> {
        let mut warnings = Vec::new();

        if options.top_k.is_some() {
            warnings.push(CallWarning::unsupported_setting("topK", None));
        }

        if matches!(options.response_format, Some(ResponseFormat::Json { .. })) {
            warnings.push(CallWarning::unsupported_setting(
                "responseFormat",
                Some("JSON response format is not supported."),
            ));
        }

        let completion_prompt =
            convert_to_qwen_completion_prompt(&options.prompt, options.input_format)?;

        let mut stop = completion_prompt.stop_sequences.unwrap_or_default();
        stop.extend(options.stop_sequences.iter().flatten().cloned());

        let mut args = Map::new();
        args.insert("model".to_string(), json!(self.model_id));
        insert_if_some(&mut args, "echo", self.settings.echo);
        insert_if_some(&mut args, "logit_bias", self.settings.logit_bias.as_ref());
        insert_if_some(&mut args, "suffix", self.settings.suffix.as_deref());
        insert_if_some(&mut args, "user", self.settings.user.as_deref());
        insert_if_some(&mut args, "max_tokens", options.max_tokens);
        insert_if_some(&mut args, "temperature", options.temperature);
        insert_if_some(&mut args, "top_p", options.top_p);
        insert_if_some(&mut args, "frequency_penalty", options.frequency_penalty);
        insert_if_some(&mut args, "presence_penalty", options.presence_penalty);
        insert_if_some(&mut args, "seed", options.seed);
        merge_provider_options(
            &mut args,
            options.provider_metadata.as_ref(),
            self.config.provider_options_name(),
        );
        args.insert("prompt".to_string(), json!(completion_prompt.prompt));
        if stop.is_empty() {
            args.retain(|key, _| key != "stop");
        } else {
            args.insert("stop".to_string(), json!(stop));
        }

        match &options.mode {
            ModelMode::Regular { tools, tool_choice } => {
                if tools.as_ref().is_some_and(|tools| !tools.is_empty()) {
                    return Err(LlmError::UnsupportedFunctionality("tools".to_string()));
                }
                if tool_choice.is_some() {
                    return Err(LlmError::UnsupportedFunctionality(
                        "toolChoice".to_string(),
                    ));
                }
                Ok((args, warnings))
            }
            ModelMode::ObjectJson { .. } => Err(LlmError::UnsupportedFunctionality(
                "object-json mode".to_string(),
            )),
            ModelMode::ObjectTool { .. } => Err(LlmError::UnsupportedFunctionality(
                "object-tool mode".to_string(),
            )),
        }
    }
}

#[async_trait]
impl LanguageModel for QwenCompletionLanguageModel {
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
        } = post_json_to_api::<QwenCompletionResponse>(
            self.config.http_client(),
            &self.config.url(COMPLETIONS_PATH),
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
            .ok_or_else(|| LlmError::ParseError("Completion response has no choices".into()))?;

        Ok(GenerateResult {
            text: Some(choice.text),
            reasoning: None,
            tool_calls: Vec::new(),
            finish_reason: map_qwen_finish_reason(choice.finish_reason.as_deref()),
            usage,
            raw_call: RawCall::from_args(&args, "prompt"),
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
            &self.config.url(COMPLETIONS_PATH),
            headers,
            &body,
            classify_qwen_http_error,
        )
        .await?;
        let raw_response_headers = extract_response_headers(response.headers());

        Ok(StreamResult {
            stream: StreamFactory::create_eventsource_stream(
                response,
                CompletionStreamReducer::new(),
            ),
            raw_call: RawCall::from_args(&args, "prompt"),
            raw_response_headers,
            warnings,
            request_body,
        })
    }
}
