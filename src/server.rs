//! HTTP transport: axum router around the stateless MCP service.
//!
//! ```text
//!   POST /mcp ─► require_bearer ─► StreamableHttpService ─► AstroServer ─► AstroTools
//!   GET  /health (no auth)
//! ```

use axum::routing::get;
use axum::{middleware, Json, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::auth::{require_bearer, TokenAuthenticator};
use crate::tools::{AstroServer, AstroTools};
use crate::types::{Config, Result};
use crate::upstream::{AstronomySource, HttpSource};

/// Build the production router from configuration.
pub fn build_router(config: &Config) -> Result<Router> {
    let source: Arc<dyn AstronomySource> = Arc::new(HttpSource::new(&config.upstream)?);
    let tools = Arc::new(AstroTools::new(source, config.auth.caller_identity.clone()));
    let authenticator = Arc::new(TokenAuthenticator::from_config(&config.auth));
    Ok(router(tools, authenticator, &config.server.mcp_path))
}

/// Assemble the router from already-built parts.
///
/// The MCP service runs in stateless mode: every POST is served by a fresh
/// [`AstroServer`] and no session survives between calls.
pub fn router(tools: Arc<AstroTools>, authenticator: Arc<TokenAuthenticator>, mcp_path: &str) -> Router {
    let mcp_service = StreamableHttpService::new(
        move || Ok(AstroServer::new(tools.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .nest_service(mcp_path, mcp_service)
        .layer(middleware::from_fn_with_state(authenticator, require_bearer))
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve `app` on `listener` until `shutdown` is cancelled.
pub async fn serve(listener: TcpListener, app: Router, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("astro-mcp listening on http://{} (stateless)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("astro-mcp shut down");
    Ok(())
}
