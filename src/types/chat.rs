//! Provider-agnostic chat prompt types.

use serde::{Deserialize, Serialize};

use super::provider_metadata::{HasProviderMetadata, ProviderMetadata};

/// Media source - unified way to represent media data across providers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MediaSource {
    /// URL (http, https, data URLs, etc.)
    Url { url: String },
    /// Already base64-encoded data
    Base64 { data: String },
    /// Raw bytes (base64-encoded when sent)
    Binary { bytes: Vec<u8> },
}

impl MediaSource {
    /// Create from URL string
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// Create from base64 string
    pub fn base64(data: impl Into<String>) -> Self {
        Self::Base64 { data: data.into() }
    }

    /// Create from binary data
    pub fn binary(bytes: Vec<u8>) -> Self {
        Self::Binary { bytes }
    }

    /// Get as URL if available
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url { url } => Some(url),
            _ => None,
        }
    }

    /// Get as base64, encoding binary data when needed
    pub fn as_base64(&self) -> Option<String> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        match self {
            Self::Url { .. } => None,
            Self::Base64 { data } => Some(data.clone()),
            Self::Binary { bytes } => Some(STANDARD.encode(bytes)),
        }
    }
}

/// Content part of a user, assistant or tool message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentPart {
    /// Text content
    Text {
        text: String,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },

    /// Image content
    Image {
        image: MediaSource,

        /// Defaults to `image/jpeg` when inlined.
        #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },

    /// File content (PDF, documents, etc.)
    File {
        data: MediaSource,

        #[serde(rename = "mimeType")]
        mime_type: String,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },

    /// Tool call requested by the model
    ToolCall {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,

        #[serde(rename = "toolName")]
        tool_name: String,

        args: serde_json::Value,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },

    /// Result of executing a tool call
    ToolResult {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,

        #[serde(rename = "toolName")]
        tool_name: String,

        result: serde_json::Value,

        #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            provider_metadata: None,
        }
    }

    /// Create an image content part from URL
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::Image {
            image: MediaSource::url(url),
            mime_type: None,
            provider_metadata: None,
        }
    }

    /// Create an image content part from raw bytes
    pub fn image_binary(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        Self::Image {
            image: MediaSource::binary(bytes),
            mime_type,
            provider_metadata: None,
        }
    }

    /// Create a file content part from raw bytes
    pub fn file_binary(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::File {
            data: MediaSource::binary(bytes),
            mime_type: mime_type.into(),
            provider_metadata: None,
        }
    }

    /// Create a tool call content part
    pub fn tool_call(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Self::ToolCall {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            provider_metadata: None,
        }
    }

    /// Create a tool result content part
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: serde_json::Value,
    ) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            result,
            is_error: None,
            provider_metadata: None,
        }
    }

    /// Attach a metadata bag for `provider`, replacing any previous bag for it.
    pub fn with_provider_metadata(
        mut self,
        provider: impl Into<String>,
        bag: serde_json::Value,
    ) -> Self {
        let slot = match &mut self {
            Self::Text {
                provider_metadata, ..
            }
            | Self::Image {
                provider_metadata, ..
            }
            | Self::File {
                provider_metadata, ..
            }
            | Self::ToolCall {
                provider_metadata, ..
            }
            | Self::ToolResult {
                provider_metadata, ..
            } => provider_metadata,
        };
        slot.get_or_insert_with(ProviderMetadata::new)
            .insert(provider.into(), bag);
        self
    }

    /// Wire-ish name of the part kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::File { .. } => "file",
            Self::ToolCall { .. } => "tool-call",
            Self::ToolResult { .. } => "tool-result",
        }
    }
}

impl HasProviderMetadata for ContentPart {
    fn provider_metadata(&self) -> Option<&ProviderMetadata> {
        match self {
            Self::Text {
                provider_metadata, ..
            }
            | Self::Image {
                provider_metadata, ..
            }
            | Self::File {
                provider_metadata, ..
            }
            | Self::ToolCall {
                provider_metadata, ..
            }
            | Self::ToolResult {
                provider_metadata, ..
            } => provider_metadata.as_ref(),
        }
    }
}

/// A single message of a chat prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System {
        content: String,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },
    User {
        content: Vec<ContentPart>,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },
    Assistant {
        content: Vec<ContentPart>,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },
    Tool {
        content: Vec<ContentPart>,

        #[serde(
            rename = "providerMetadata",
            alias = "provider_metadata",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_metadata: Option<ProviderMetadata>,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
            provider_metadata: None,
        }
    }

    pub fn user(content: Vec<ContentPart>) -> Self {
        Self::User {
            content,
            provider_metadata: None,
        }
    }

    /// Single text part user message
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentPart::text(text)])
    }

    pub fn assistant(content: Vec<ContentPart>) -> Self {
        Self::Assistant {
            content,
            provider_metadata: None,
        }
    }

    pub fn tool(content: Vec<ContentPart>) -> Self {
        Self::Tool {
            content,
            provider_metadata: None,
        }
    }

    /// Attach a message-level metadata bag for `provider`.
    pub fn with_provider_metadata(
        mut self,
        provider: impl Into<String>,
        bag: serde_json::Value,
    ) -> Self {
        let slot = match &mut self {
            Self::System {
                provider_metadata, ..
            }
            | Self::User {
                provider_metadata, ..
            }
            | Self::Assistant {
                provider_metadata, ..
            }
            | Self::Tool {
                provider_metadata, ..
            } => provider_metadata,
        };
        slot.get_or_insert_with(ProviderMetadata::new)
            .insert(provider.into(), bag);
        self
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }
}

impl HasProviderMetadata for ChatMessage {
    fn provider_metadata(&self) -> Option<&ProviderMetadata> {
        match self {
            Self::System {
                provider_metadata, ..
            }
            | Self::User {
                provider_metadata, ..
            }
            | Self::Assistant {
                provider_metadata, ..
            }
            | Self::Tool {
                provider_metadata, ..
            } => provider_metadata.as_ref(),
        }
    }
}

/// Ordered chat prompt.
pub type Prompt = Vec<ChatMessage>;
