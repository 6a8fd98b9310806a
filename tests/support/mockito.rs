//! mockito test utilities
//!
//! Async server creation plus JSON and SSE response helpers.

#![allow(dead_code)]

pub use ::mockito::{Matcher, Mock, Server, ServerGuard};

/// Start an async mockito Server
pub async fn start() -> ServerGuard {
    Server::new_async().await
}

/// Get the Server base URL (including scheme)
pub fn url(server: &ServerGuard) -> String {
    server.url()
}

/// JSON response mock for `POST path`
pub async fn json_mock(server: &mut ServerGuard, path: &str, status: u16, body_json: &str) -> Mock {
    server
        .mock("POST", path)
        .with_status(status as usize)
        .with_header("content-type", "application/json")
        .with_body(body_json)
        .create_async()
        .await
}

/// SSE response mock for `POST path`, serving `chunks` back to back
pub async fn sse_mock(server: &mut ServerGuard, path: &str, chunks: &[String]) -> Mock {
    server
        .mock("POST", path)
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_header("cache-control", "no-cache")
        .with_body(chunks.concat())
        .create_async()
        .await
}
