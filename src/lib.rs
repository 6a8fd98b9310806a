//! # siumai-provider-qwen
//!
//! Qwen (DashScope OpenAI-compatible) provider: converts generic chat prompts
//! into the Qwen wire format and maps responses, including SSE streams, back
//! into a provider-agnostic shape.
//!
//! ```rust,no_run
//! use siumai_provider_qwen::prelude::*;
//!
//! # async fn run() -> Result<(), LlmError> {
//! let qwen = create_qwen(QwenProviderSettings::new().with_api_key("sk-..."))?;
//! let model = qwen.chat_model(models::QWEN_PLUS, Default::default());
//! let result = model
//!     .do_generate(CallOptions::new(vec![ChatMessage::user_text("Hello")]))
//!     .await?;
//! println!("{:?}", result.text);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod providers;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::LlmError;
pub use traits::{EmbeddingModel, LanguageModel};

/// Commonly used items
pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::providers::qwen::{
        Qwen, QwenChatSettings, QwenCompletionSettings, QwenEmbeddingSettings,
        QwenProviderSettings, create_qwen, models,
    };
    pub use crate::traits::{EmbeddingModel, LanguageModel};
    pub use crate::types::*;
}
