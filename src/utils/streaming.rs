//! Common Streaming Utilities
//!
//! SSE parsing via eventsource-stream and a driver that folds parsed frames
//! through a provider-specific [`StreamReducer`] into a [`LanguageModelStream`].

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::error::LlmError;
use crate::types::{LanguageModelStream, StreamPart};

/// Stateful fold from wire chunks (or per-chunk failures) to stream parts.
///
/// One reducer instance serves exactly one streaming call.
pub trait StreamReducer: Send + 'static {
    /// Parsed wire chunk
    type Chunk: Send + 'static;

    /// Handle one incoming chunk, returning the parts to emit in order.
    fn reduce(&mut self, chunk: Result<Self::Chunk, LlmError>) -> Vec<StreamPart>;

    /// Called once after the input is exhausted.
    fn finish(&mut self) -> Vec<StreamPart>;
}

/// Stream factory for building provider streams
pub struct StreamFactory;

impl StreamFactory {
    /// Parse the SSE body of `response` and fold it through `reducer`.
    pub fn create_eventsource_stream<R>(response: reqwest::Response, reducer: R) -> LanguageModelStream
    where
        R: StreamReducer,
        R::Chunk: DeserializeOwned,
    {
        Self::reduce_stream(parse_sse_json_stream::<R::Chunk>(response), reducer)
    }

    /// Drive `reducer` over an arbitrary chunk stream.
    ///
    /// Parts are yielded as soon as each chunk is reduced. The reducer's
    /// `finish` output follows the last chunk. Dropping the returned stream
    /// stops consumption of `input`.
    pub fn reduce_stream<S, R>(input: S, mut reducer: R) -> LanguageModelStream
    where
        S: Stream<Item = Result<R::Chunk, LlmError>> + Send + 'static,
        R: StreamReducer,
    {
        Box::pin(async_stream::stream! {
            let mut input = Box::pin(input);
            while let Some(chunk) = input.next().await {
                for part in reducer.reduce(chunk) {
                    yield part;
                }
            }
            for part in reducer.finish() {
                yield part;
            }
        })
    }
}

/// Decode an SSE response into JSON frames of type `T`.
///
/// Empty frames are skipped and `[DONE]` ends the stream. A frame that fails
/// to parse becomes `Err(ParseError)` without ending the stream. A transport
/// failure yields one `Err(StreamError)` and ends it.
pub fn parse_sse_json_stream<T>(
    response: reqwest::Response,
) -> impl Stream<Item = Result<T, LlmError>> + Send + 'static
where
    T: DeserializeOwned + Send + 'static,
{
    async_stream::stream! {
        let mut events = Box::pin(response.bytes_stream().eventsource());
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    let data = event.data.trim();
                    if data.is_empty() {
                        continue;
                    }
                    if data == "[DONE]" {
                        break;
                    }
                    trace!(target: "siumai::qwen", data, "sse frame");
                    yield serde_json::from_str::<T>(data).map_err(|e| {
                        warn!(target: "siumai::qwen", error = %e, "unparsable stream frame");
                        LlmError::ParseError(format!("Failed to parse stream frame: {e}"))
                    });
                }
                Err(e) => {
                    yield Err(LlmError::StreamError(format!("SSE parsing error: {e}")));
                    break;
                }
            }
        }
    }
}
