//! Shared helpers for the integration tests

#![allow(dead_code)]

pub mod mockito;
pub mod stream_fixture;

use ::mockito::ServerGuard;
use siumai_provider_qwen::prelude::*;

pub const TEST_API_KEY: &str = "test-api-key";

/// Provider pointed at the mock server, with a trailing slash on the base URL.
pub fn qwen(server: &ServerGuard) -> Qwen {
    create_qwen(
        QwenProviderSettings::new()
            .with_base_url(format!("{}/", self::mockito::url(server)))
            .with_api_key(TEST_API_KEY),
    )
    .expect("valid provider settings")
}

/// `[{user, [text "Hello"]}]` in prompt form
pub fn hello_options() -> CallOptions {
    CallOptions::new(vec![ChatMessage::user_text("Hello")])
}

/// Drain a model stream into a vector
pub async fn collect(stream: LanguageModelStream) -> Vec<StreamPart> {
    use futures::StreamExt;
    stream.collect().await
}
