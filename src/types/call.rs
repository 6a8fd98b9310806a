//! Call options shared by every language model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::chat::Prompt;
use super::provider_metadata::ProviderMetadata;
use super::tools::{FunctionTool, Tool, ToolChoice};

/// How the caller phrased its input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// A single prompt string wrapped into a user message
    #[default]
    Prompt,
    /// A full message list
    Messages,
}

/// Generation mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModelMode {
    Regular {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tools: Option<Vec<Tool>>,
        #[serde(rename = "toolChoice", default, skip_serializing_if = "Option::is_none")]
        tool_choice: Option<ToolChoice>,
    },
    ObjectJson {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    ObjectTool { tool: FunctionTool },
}

impl Default for ModelMode {
    fn default() -> Self {
        Self::Regular {
            tools: None,
            tool_choice: None,
        }
    }
}

/// Requested response format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseFormat {
    Text,
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<serde_json::Value>,
    },
}

/// Options for a single `do_generate` / `do_stream` call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub input_format: InputFormat,
    pub mode: ModelMode,
    pub prompt: Prompt,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
    pub response_format: Option<ResponseFormat>,
    pub seed: Option<u64>,
    /// Provider-specific request options, keyed by provider name.
    pub provider_metadata: Option<ProviderMetadata>,
    /// Extra headers for this call only.
    pub headers: HashMap<String, String>,
}

impl CallOptions {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            ..Default::default()
        }
    }

    pub fn with_input_format(mut self, input_format: InputFormat) -> Self {
        self.input_format = input_format;
        self
    }

    pub fn with_mode(mut self, mode: ModelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_provider_metadata(
        mut self,
        provider: impl Into<String>,
        bag: serde_json::Value,
    ) -> Self {
        self.provider_metadata
            .get_or_insert_with(ProviderMetadata::new)
            .insert(provider.into(), bag);
        self
    }
}

/// Non-fatal problem with the call settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    UnsupportedSetting {
        setting: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    UnsupportedTool {
        tool: Tool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Other {
        message: String,
    },
}

impl CallWarning {
    pub fn unsupported_setting(setting: impl Into<String>, details: Option<&str>) -> Self {
        Self::UnsupportedSetting {
            setting: setting.into(),
            details: details.map(str::to_string),
        }
    }
}
