//! Tool calling and function definition types

use serde::{Deserialize, Serialize};

/// Tool made available to the model in regular mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Tool {
    /// User-defined function executed by the caller
    Function(FunctionTool),
    /// Tool implemented by a provider (not representable on the Qwen wire)
    ProviderDefined {
        /// `<provider>.<tool>` identifier
        id: String,
        name: String,
        #[serde(default)]
        args: serde_json::Value,
    },
}

impl Tool {
    /// Create a new function tool
    pub fn function(
        name: impl Into<String>,
        description: Option<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self::Function(FunctionTool {
            name: name.into(),
            description,
            parameters,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::ProviderDefined { name, .. } => name,
        }
    }
}

/// Tool function definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionTool {
    /// Function name
    pub name: String,
    /// Function description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for function parameters
    pub parameters: serde_json::Value,
}

/// How the model should pick tools
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    Tool {
        #[serde(rename = "toolName")]
        tool_name: String,
    },
}

/// Kind of a tool call emitted by the model (only functions today)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallType {
    #[default]
    Function,
}

/// Tool call produced by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    #[serde(rename = "toolCallType")]
    pub tool_call_type: ToolCallType,
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Stringified JSON arguments
    pub args: String,
}
