//! Utility modules shared by the Qwen models.

pub mod http;
pub mod streaming;

pub use http::{HttpHeaderBuilder, JsonResponse, extract_response_headers};
pub use streaming::{StreamFactory, StreamReducer, parse_sse_json_stream};
