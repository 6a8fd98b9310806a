//! HTTP helpers shared by the Qwen models.
//!
//! Header building follows the usual order: authorization first, then
//! provider-level custom headers, then per-call headers.

use std::collections::HashMap;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::LlmError;

/// Classifies a non-success response body into an error.
pub type HttpErrorClassifier = fn(u16, &str) -> LlmError;

/// HTTP header builder for API requests
#[derive(Debug, Default)]
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, LlmError> {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key format: {e}")))?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Add JSON content type
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Add a custom header, replacing any previous value under the same name
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, LlmError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid header value for '{name}': {e}"))
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Add every header of `headers`
    pub fn with_headers(mut self, headers: &HashMap<String, String>) -> Result<Self, LlmError> {
        for (name, value) in headers {
            self = self.with_header(name, value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

/// Flatten response headers into a plain map. Non UTF-8 values are skipped.
pub fn extract_response_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Response of a successful JSON POST
#[derive(Debug)]
pub struct JsonResponse<T> {
    pub value: T,
    pub headers: HashMap<String, String>,
}

/// POST `body` and return the response once its status is known to be a success.
pub async fn post_to_api(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &serde_json::Value,
    classify: HttpErrorClassifier,
) -> Result<reqwest::Response, LlmError> {
    let stream = body
        .get("stream")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    debug!(target: "siumai::qwen", url, stream, "sending request");

    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::HttpError(format!("Failed to send request: {e}")))?;

    let status = response.status();
    debug!(target: "siumai::qwen", status = status.as_u16(), "received response");

    if !status.is_success() {
        let body_text = response
            .text()
            .await
            .map_err(|e| LlmError::HttpError(format!("Failed to read error body: {e}")))?;
        return Err(classify(status.as_u16(), &body_text));
    }

    Ok(response)
}

/// POST `body` and decode the JSON response into `T`.
pub async fn post_json_to_api<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &serde_json::Value,
    classify: HttpErrorClassifier,
) -> Result<JsonResponse<T>, LlmError> {
    let response = post_to_api(client, url, headers, body, classify).await?;
    let headers = extract_response_headers(response.headers());
    let text = response
        .text()
        .await
        .map_err(|e| LlmError::HttpError(format!("Failed to read response body: {e}")))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| LlmError::ParseError(format!("Failed to parse response: {e}")))?;
    Ok(JsonResponse { value, headers })
}
