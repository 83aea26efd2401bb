//! HTTP transport tests: bearer gate in front of the MCP endpoint.

use astro_mcp::auth::TokenAuthenticator;
use astro_mcp::server::{router, serve};
use astro_mcp::tools::AstroTools;
use astro_mcp::types::UpstreamConfig;
use astro_mcp::upstream::HttpSource;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const TOKEN: &str = "s3cret-token";

/// Helper: serve the full router on a random port.
async fn start_server() -> (SocketAddr, CancellationToken) {
    let source = HttpSource::new(&UpstreamConfig {
        nasa_api_key: "KEY".into(),
        ..UpstreamConfig::default()
    })
    .unwrap();
    let tools = Arc::new(AstroTools::new(Arc::new(source), "919876543210"));
    let authenticator = Arc::new(TokenAuthenticator::new(TOKEN, "astro-client"));
    let app = router(tools, authenticator, "/mcp");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        let _ = serve(listener, app, token).await;
    });

    (addr, shutdown)
}

fn initialize_body() -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "transport-test", "version": "0.0.1" },
        },
    })
}

fn tool_call_body(name: &str, arguments: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    })
}

fn post_mcp(addr: SocketAddr, body: &serde_json::Value) -> reqwest::RequestBuilder {
    reqwest::Client::new()
        .post(format!("http://{}/mcp", addr))
        .header(ACCEPT, "application/json, text/event-stream")
        .header(CONTENT_TYPE, "application/json")
        .json(body)
}

fn mcp_request(addr: SocketAddr) -> reqwest::RequestBuilder {
    post_mcp(addr, &initialize_body())
}

/// Send an authorized tool call and return the JSON-RPC message carried in
/// the event-stream response.
async fn call_tool(addr: SocketAddr, name: &str, arguments: serde_json::Value) -> serde_json::Value {
    let response = post_mcp(addr, &tool_call_body(name, arguments))
        .header(AUTHORIZATION, format!("Bearer {}", TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = tokio::time::timeout(Duration::from_secs(10), response.text())
        .await
        .expect("tool call response did not finish")
        .unwrap();
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<serde_json::Value>(data.trim()).ok())
        .find(|message| message["id"] == 2)
        .unwrap_or_else(|| panic!("no JSON-RPC response in body: {body}"))
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let (addr, shutdown) = start_server().await;

    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));

    shutdown.cancel();
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (addr, shutdown) = start_server().await;

    let response = mcp_request(addr).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(WWW_AUTHENTICATE));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_token");
    assert_eq!(body["error_description"], "missing bearer token");

    shutdown.cancel();
}

#[tokio::test]
async fn test_wrong_token_is_unauthorized() {
    let (addr, shutdown) = start_server().await;

    for header in ["Bearer wrong", "Basic czNjcmV0LXRva2Vu", "Bearer s3cret-token-x"] {
        let response = mcp_request(addr).header(AUTHORIZATION, header).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header}");
    }

    shutdown.cancel();
}

#[tokio::test]
async fn test_valid_token_reaches_mcp_service() {
    let (addr, shutdown) = start_server().await;

    let response = mcp_request(addr)
        .header(AUTHORIZATION, format!("Bearer {}", TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    shutdown.cancel();
}

#[tokio::test]
async fn test_tool_call_sees_grant_from_bearer_gate() {
    let (addr, shutdown) = start_server().await;

    let message = call_tool(addr, "validate", serde_json::json!({})).await;
    assert_eq!(message["result"]["isError"], false);
    assert_eq!(
        message["result"]["content"],
        serde_json::json!([{ "type": "text", "text": "919876543210" }])
    );

    shutdown.cancel();
}

#[tokio::test]
async fn test_tool_error_crosses_transport_with_kind() {
    let (addr, shutdown) = start_server().await;

    // Rejected before any upstream request is made.
    let message = call_tool(addr, "get_planet", serde_json::json!({ "planet_name": "  " })).await;
    assert_eq!(message["error"]["code"], -32602);
    assert_eq!(
        message["error"]["message"],
        "Planet fetch error: Planet name must not be empty"
    );
    assert_eq!(message["error"]["data"]["kind"], "invalid_input");

    shutdown.cancel();
}
