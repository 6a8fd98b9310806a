//! Qwen text embedding model (`/embeddings`)

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::config::QwenModelConfig;
use super::errors::classify_qwen_http_error;
use super::settings::QwenEmbeddingSettings;
use super::types::QwenEmbeddingResponse;
use super::utils::insert_if_some;
use crate::error::LlmError;
use crate::traits::EmbeddingModel;
use crate::types::{EmbeddingResult, EmbeddingUsage};
use crate::utils::http::{JsonResponse, post_json_to_api};

const EMBEDDINGS_PATH: &str = "/embeddings";

/// Default batch limit of a single embed call
pub const DEFAULT_MAX_EMBEDDINGS_PER_CALL: usize = 2048;

#[derive(Debug, Clone)]
pub struct QwenEmbeddingModel {
    model_id: String,
    settings: QwenEmbeddingSettings,
    config: QwenModelConfig,
    max_embeddings_per_call: usize,
    supports_parallel_calls: bool,
}

impl QwenEmbeddingModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: QwenEmbeddingSettings,
        config: QwenModelConfig,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
            max_embeddings_per_call: DEFAULT_MAX_EMBEDDINGS_PER_CALL,
            supports_parallel_calls: true,
        }
    }

    pub fn with_max_embeddings_per_call(mut self, max: usize) -> Self {
        self.max_embeddings_per_call = max;
        self
    }

    pub fn with_parallel_calls(mut self, supported: bool) -> Self {
        self.supports_parallel_calls = supported;
        self
    }

    fn request_body(&self, values: &[String]) -> Value {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.model_id));
        body.insert("input".to_string(), json!(values));
        body.insert("encoding_format".to_string(), json!("float"));
        insert_if_some(&mut body, "dimensions", self.settings.dimensions);
        insert_if_some(&mut body, "user", self.settings.user.as_deref());
        insert_if_some(&mut body, "text_type", self.settings.text_type.as_deref());
        insert_if_some(&mut body, "output_type", self.settings.output_type.as_deref());
        Value::Object(body)
    }
}

#[async_trait]
impl EmbeddingModel for QwenEmbeddingModel {
    fn provider(&self) -> &str {
        &self.config.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_embeddings_per_call(&self) -> usize {
        self.max_embeddings_per_call
    }

    fn supports_parallel_calls(&self) -> bool {
        self.supports_parallel_calls
    }

    async fn do_embed(
        &self,
        values: Vec<String>,
        headers: HashMap<String, String>,
    ) -> Result<EmbeddingResult, LlmError> {
        if values.len() > self.max_embeddings_per_call {
            return Err(LlmError::TooManyEmbeddingValuesForCall {
                provider: self.config.provider.clone(),
                model_id: self.model_id.clone(),
                max_embeddings_per_call: self.max_embeddings_per_call,
                values: values.len(),
            });
        }

        let body = self.request_body(&values);
        let headers = self.config.headers(&headers)?;
        let JsonResponse {
            value: response,
            headers: raw_response_headers,
        } = post_json_to_api::<QwenEmbeddingResponse>(
            self.config.http_client(),
            &self.config.url(EMBEDDINGS_PATH),
            headers,
            &body,
            classify_qwen_http_error,
        )
        .await?;

        Ok(EmbeddingResult {
            embeddings: response.data.into_iter().map(|item| item.embedding).collect(),
            usage: response.usage.map(|usage| EmbeddingUsage {
                tokens: usage.prompt_tokens,
            }),
            raw_response_headers,
        })
    }
}
