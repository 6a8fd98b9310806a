//! Test fixtures utilities: load SSE chunks and drive stream reducers

use std::io;

use futures::StreamExt;
use serde::de::DeserializeOwned;
use siumai_provider_qwen::LlmError;
use siumai_provider_qwen::types::StreamPart;
use siumai_provider_qwen::utils::{StreamFactory, StreamReducer};

/// Load an `.sse` fixture file and return the `data:` payload of every event
pub fn load_sse_fixture(path: &str) -> io::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    let normalized = raw.replace("\r\n", "\n");
    Ok(normalized
        .split("\n\n")
        .filter_map(|event| {
            event
                .lines()
                .find_map(|line| line.strip_prefix("data:"))
                .map(|data| data.trim().to_string())
        })
        .filter(|data| !data.is_empty())
        .collect())
}

/// Parse fixture payloads up to `[DONE]` and reduce them with `reducer`
pub async fn reduce_fixture<R>(path: &str, reducer: R) -> Vec<StreamPart>
where
    R: StreamReducer,
    R::Chunk: DeserializeOwned,
{
    let frames: Vec<Result<R::Chunk, LlmError>> = load_sse_fixture(path)
        .expect("fixture exists")
        .into_iter()
        .take_while(|data| data != "[DONE]")
        .map(|data| {
            serde_json::from_str(&data).map_err(|e| LlmError::ParseError(e.to_string()))
        })
        .collect();
    StreamFactory::reduce_stream(futures::stream::iter(frames), reducer)
        .collect()
        .await
}
