//! Qwen provider factory

use super::chat::QwenChatLanguageModel;
use super::completion::QwenCompletionLanguageModel;
use super::config::{QwenModelConfig, QwenProviderSettings};
use super::embedding::QwenEmbeddingModel;
use super::settings::{QwenChatSettings, QwenCompletionSettings, QwenEmbeddingSettings};
use crate::error::LlmError;

/// Creates Qwen models that share one set of provider settings.
#[derive(Debug, Clone)]
pub struct Qwen {
    settings: QwenProviderSettings,
}

/// Create a Qwen provider.
///
/// The API key is resolved per request, so a missing key surfaces on the
/// first call rather than here.
pub fn create_qwen(settings: QwenProviderSettings) -> Result<Qwen, LlmError> {
    Qwen::new(settings)
}

impl Qwen {
    pub fn new(settings: QwenProviderSettings) -> Result<Self, LlmError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &QwenProviderSettings {
        &self.settings
    }

    fn model_config(&self, model_type: &str) -> QwenModelConfig {
        QwenModelConfig::from_settings(&self.settings, model_type)
    }

    /// Chat model for text generation
    pub fn chat_model(
        &self,
        model_id: impl Into<String>,
        settings: QwenChatSettings,
    ) -> QwenChatLanguageModel {
        QwenChatLanguageModel::new(model_id, settings, self.model_config("chat"))
    }

    /// Same as [`Qwen::chat_model`]
    pub fn language_model(
        &self,
        model_id: impl Into<String>,
        settings: QwenChatSettings,
    ) -> QwenChatLanguageModel {
        self.chat_model(model_id, settings)
    }

    /// Legacy completion model
    pub fn completion(
        &self,
        model_id: impl Into<String>,
        settings: QwenCompletionSettings,
    ) -> QwenCompletionLanguageModel {
        QwenCompletionLanguageModel::new(model_id, settings, self.model_config("completion"))
    }

    pub fn text_embedding_model(
        &self,
        model_id: impl Into<String>,
        settings: QwenEmbeddingSettings,
    ) -> QwenEmbeddingModel {
        QwenEmbeddingModel::new(model_id, settings, self.model_config("embedding"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{EmbeddingModel, LanguageModel};

    #[test]
    fn models_carry_their_provider_names() {
        let qwen = create_qwen(QwenProviderSettings::new().with_api_key("k")).unwrap();

        let chat = qwen.chat_model("qwen-plus", Default::default());
        assert_eq!(chat.provider(), "qwen.chat");
        assert_eq!(chat.model_id(), "qwen-plus");
        assert_eq!(
            qwen.language_model("qwen-max", Default::default()).provider(),
            "qwen.chat"
        );
        assert_eq!(
            qwen.completion("qwen-plus", Default::default()).provider(),
            "qwen.completion"
        );

        let embedding = qwen.text_embedding_model("text-embedding-v3", Default::default());
        assert_eq!(embedding.provider(), "qwen.embedding");
        assert_eq!(embedding.max_embeddings_per_call(), 2048);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = create_qwen(QwenProviderSettings::new().with_base_url("localhost:8080")).unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(_)));
    }
}
