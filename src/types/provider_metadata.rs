//! Provider metadata helpers.
//!
//! Messages and parts carry an open map from provider name to an arbitrary JSON
//! bag. Only the bag keyed by the provider doing the conversion is ever read.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Provider name -> provider-defined bag.
pub type ProviderMetadata = HashMap<String, Value>;

/// Anything that may carry a provider metadata map.
pub trait HasProviderMetadata {
    fn provider_metadata(&self) -> Option<&ProviderMetadata>;
}

/// Resolve the bag stored under `provider`.
///
/// Returns an empty map when the item, its metadata map, or the entry is
/// missing, and when the entry is not a JSON object.
pub fn extract_provider_metadata<T>(item: Option<&T>, provider: &str) -> Map<String, Value>
where
    T: HasProviderMetadata + ?Sized,
{
    item.and_then(HasProviderMetadata::provider_metadata)
        .and_then(|metadata| metadata.get(provider))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
