//! Qwen response helpers

use chrono::DateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{FinishReason, ProviderMetadata, ResponseMetadata};

/// Insert `value` under `key` unless it is `None`.
pub(crate) fn insert_if_some<T: Serialize>(
    args: &mut Map<String, Value>,
    key: &str,
    value: Option<T>,
) {
    if let Some(value) = value
        && let Ok(value) = serde_json::to_value(value)
    {
        args.insert(key.to_string(), value);
    }
}

/// Spread the caller's request options for `provider_options_name` into `args`.
pub(crate) fn merge_provider_options(
    args: &mut Map<String, Value>,
    provider_metadata: Option<&ProviderMetadata>,
    provider_options_name: &str,
) {
    let Some(provider_metadata) = provider_metadata else {
        return;
    };

    let Some(Value::Object(options)) = provider_metadata.get(provider_options_name) else {
        return;
    };

    for (k, v) in options {
        args.insert(k.clone(), v.clone());
    }
}

/// Map a backend finish token to the generic finish reason.
pub fn map_qwen_finish_reason(finish_reason: Option<&str>) -> FinishReason {
    match finish_reason {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("tool_calls") => FinishReason::ToolCalls,
        _ => FinishReason::Unknown,
    }
}

/// Response metadata from the `id`, `created` (epoch seconds) and `model` fields.
pub fn get_response_metadata(
    id: Option<&str>,
    created: Option<i64>,
    model: Option<&str>,
) -> ResponseMetadata {
    ResponseMetadata {
        id: id.map(str::to_string),
        timestamp: created.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        model_id: model.map(str::to_string),
    }
}
