//! Qwen (Alibaba DashScope) provider
//!
//! Talks to the OpenAI-compatible endpoint of DashScope:
//! - `chat` for `/chat/completions` (text, images, tools, streaming)
//! - `completion` for the legacy `/completions` endpoint
//! - `embedding` for `/embeddings`

pub mod chat;
pub mod completion;
pub mod config;
pub mod convert;
pub mod embedding;
pub mod errors;
pub mod provider;
pub mod settings;
pub mod streaming;
pub mod types;
pub mod utils;

pub use chat::QwenChatLanguageModel;
pub use completion::QwenCompletionLanguageModel;
pub use config::{QwenModelConfig, QwenProviderSettings};
pub use convert::{
    QWEN_PROVIDER_KEY, QwenCompletionPrompt, convert_to_qwen_chat_messages,
    convert_to_qwen_completion_prompt,
};
pub use embedding::QwenEmbeddingModel;
pub use errors::classify_qwen_http_error;
pub use provider::{Qwen, create_qwen};
pub use settings::{QwenChatSettings, QwenCompletionSettings, QwenEmbeddingSettings, models};
pub use streaming::{ChatStreamReducer, CompletionStreamReducer};
pub use utils::{get_response_metadata, map_qwen_finish_reason};
