//! Qwen provider configuration
//!
//! Provider-wide settings plus the per-model config each model is built with.

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::utils::HttpHeaderBuilder;

/// Default DashScope OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV_VAR: &str = "DASHSCOPE_API_KEY";

/// Provider-level settings shared by every model created from one provider
#[derive(Clone, Default)]
pub struct QwenProviderSettings {
    /// URL prefix for API calls. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// API key sent as a bearer token. Falls back to `DASHSCOPE_API_KEY`.
    pub api_key: Option<SecretString>,
    /// Custom headers sent with every request
    pub headers: HashMap<String, String>,
    /// Query parameters appended to every request URL
    pub query_params: Vec<(String, String)>,
    /// Custom HTTP client
    pub http_client: Option<reqwest::Client>,
}

impl std::fmt::Debug for QwenProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("QwenProviderSettings");
        ds.field("base_url", &self.base_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("query_params", &self.query_params);
        if self.api_key.is_some() {
            ds.field("has_api_key", &true);
        }
        if self.http_client.is_some() {
            ds.field("has_http_client", &true);
        }
        ds.finish()
    }
}

impl QwenProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter appended to every request URL
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Base URL with at most one trailing slash removed
    pub fn resolved_base_url(&self) -> String {
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        base_url.strip_suffix('/').unwrap_or(base_url).to_string()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        let base_url = self.resolved_base_url();
        if base_url.is_empty() {
            return Err(LlmError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(LlmError::ConfigurationError(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration handed to each Qwen model
#[derive(Clone)]
pub struct QwenModelConfig {
    /// Provider identifier, e.g. `qwen.chat`
    pub provider: String,
    base_url: String,
    api_key: Option<SecretString>,
    headers: HashMap<String, String>,
    query_params: Vec<(String, String)>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for QwenModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QwenModelConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl QwenModelConfig {
    /// Build the config for one model type (`chat`, `completion`, `embedding`).
    pub fn from_settings(settings: &QwenProviderSettings, model_type: &str) -> Self {
        Self::new(format!("qwen.{model_type}"), settings)
    }

    pub fn new(provider: impl Into<String>, settings: &QwenProviderSettings) -> Self {
        Self {
            provider: provider.into(),
            base_url: settings.resolved_base_url(),
            api_key: settings.api_key.clone(),
            headers: settings.headers.clone(),
            query_params: settings.query_params.clone(),
            http_client: settings.http_client.clone().unwrap_or_default(),
        }
    }

    /// Key under which callers pass request options for this provider.
    ///
    /// `qwen.chat` resolves to `qwen`; a provider without a dot is used as is.
    pub fn provider_options_name(&self) -> &str {
        self.provider.split('.').next().unwrap_or_default().trim()
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Full request URL for `path`, including configured query parameters
    pub fn url(&self, path: &str) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !self.query_params.is_empty() {
            let query = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// API key from the settings, else from `DASHSCOPE_API_KEY`.
    pub fn load_api_key(&self) -> Result<String, LlmError> {
        if let Some(key) = &self.api_key {
            return Ok(key.expose_secret().to_string());
        }
        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey(format!(
                "Qwen API key is missing. Pass it using the 'api_key' setting or the {API_KEY_ENV_VAR} environment variable."
            ))),
        }
    }

    /// Request headers: authorization, provider headers, then per-call headers.
    pub fn headers(&self, per_call: &HashMap<String, String>) -> Result<HeaderMap, LlmError> {
        let api_key = self.load_api_key()?;
        Ok(HttpHeaderBuilder::new()
            .with_bearer_auth(&api_key)?
            .with_headers(&self.headers)?
            .with_headers(per_call)?
            .with_json_content_type()
            .build())
    }
}
