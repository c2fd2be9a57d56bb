//! Shared helpers for router tests.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

/// Build a JSON request for `tower::ServiceExt::oneshot`.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Collect a response body and parse it as JSON.
pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
