//! JSON-RPC over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::McpServer;

/// Router with `POST /mcp` (also accepted on `/`) and `GET /health`.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", post(handle_mcp))
        .route("/mcp", post(handle_mcp))
        .route("/health", get(health_check))
        .with_state(server)
}

async fn handle_mcp(State(server): State<Arc<McpServer>>, body: String) -> Response {
    match server.handle_payload(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Listen on `0.0.0.0:{port}` until `shutdown` is cancelled.
///
/// Cancellation stops accepting connections; in-flight requests complete.
pub async fn serve_http(
    server: Arc<McpServer>,
    port: u16,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Serving MCP over HTTP");

    axum::serve(listener, router(server))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AlertmanagerClient;
    use crate::tools::ToolRegistry;
    use crate::transport::ReqwestTransport;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        let transport = ReqwestTransport::new("http://127.0.0.1:9").unwrap();
        router(Arc::new(McpServer::new(ToolRegistry::new(
            AlertmanagerClient::from_transport(Arc::new(transport)),
        ))))
    }

    fn post_mcp(body: &str) -> Request<Body> {
        post_to("/mcp", body)
    }

    fn post_to(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "healthy");
    }

    #[tokio::test]
    async fn mcp_endpoint_answers_json_rpc() {
        let response = app()
            .oneshot(post_mcp(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["result"]["tools"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn root_path_also_answers_json_rpc() {
        let response = app()
            .oneshot(post_to("/", r#"{"jsonrpc":"2.0","id":"root","method":"ping"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["id"], "root");
        assert_eq!(value["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn notifications_are_accepted_without_body() {
        let response = app()
            .oneshot(post_mcp(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let response = app().oneshot(post_mcp("{oops")).await.unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], -32700);
    }
}
