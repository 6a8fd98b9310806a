//! Model traits implemented by every provider model.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{CallOptions, EmbeddingResult, GenerateResult, StreamResult};

/// Text generation model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider identifier, e.g. `qwen.chat`
    fn provider(&self) -> &str;

    fn model_id(&self) -> &str;

    /// Generate a complete response.
    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, LlmError>;

    /// Generate a streamed response.
    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, LlmError>;
}

/// Text embedding model
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn provider(&self) -> &str;

    fn model_id(&self) -> &str;

    /// Maximum number of values accepted by a single `do_embed` call
    fn max_embeddings_per_call(&self) -> usize;

    fn supports_parallel_calls(&self) -> bool;

    /// Embed `values`, returning one vector per input in order.
    async fn do_embed(
        &self,
        values: Vec<String>,
        headers: HashMap<String, String>,
    ) -> Result<EmbeddingResult, LlmError>;
}
