//! MCP surface: exposes [`AstroTools`] through `rmcp`.
//!
//! The bearer middleware stores an [`AccessGrant`] in the HTTP request
//! extensions; `rmcp` hands the request parts to the handler, and
//! `call_tool` refuses to route anything that arrives without a grant.

use rmcp::{
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
        ServerHandler,
    },
    model::*,
    service::{RequestContext, RoleServer},
    tool, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use std::sync::Arc;

use super::dispatcher::{AstroTools, ImageMode};
use crate::auth::AccessGrant;

#[derive(Clone)]
pub struct AstroServer {
    tool_router: ToolRouter<Self>,
    tools: Arc<AstroTools>,
    grant: Option<AccessGrant>,
}

impl std::fmt::Debug for AstroServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstroServer")
            .field("tools", &self.tools)
            .field("grant", &self.grant)
            .finish_non_exhaustive()
    }
}

impl AstroServer {
    fn with_grant(&self, grant: AccessGrant) -> Self {
        Self {
            grant: Some(grant),
            ..self.clone()
        }
    }

    fn grant(&self) -> Result<&AccessGrant, McpError> {
        self.grant.as_ref().ok_or_else(missing_grant)
    }
}

fn missing_grant() -> McpError {
    McpError::new(ErrorCode::INVALID_REQUEST, "request carries no access grant", None)
}

/// Grant attached to the HTTP request by the bearer middleware, if any.
fn request_grant(context: &RequestContext<RoleServer>) -> Option<AccessGrant> {
    context
        .extensions
        .get::<axum::http::request::Parts>()
        .and_then(|parts| parts.extensions.get::<AccessGrant>())
        .cloned()
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(value)
        .map_err(|e| McpError::new(ErrorCode::INTERNAL_ERROR, e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

// ── Argument structs ──────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DailyImageArgs {
    #[schemars(description = "Date in YYYY-MM-DD format (optional, defaults to the latest entry)")]
    pub date: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PlanetArgs {
    #[schemars(description = "Planet name (e.g., mars, jupiter)")]
    pub planet_name: String,
}

// ── Tool implementations ──────────────────────────────────────────────

#[tool_router]
impl AstroServer {
    pub fn new(tools: Arc<AstroTools>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            tools,
            grant: None,
        }
    }

    #[tool(description = "Return the identifier of the configured caller")]
    async fn validate(&self) -> Result<CallToolResult, McpError> {
        let identity = self.tools.validate(self.grant()?)?;
        Ok(CallToolResult::success(vec![Content::text(identity)]))
    }

    #[tool(description = "Get NASA Astronomy Picture of the Day with display and page links")]
    async fn get_daily_image(&self, args: Parameters<DailyImageArgs>) -> Result<CallToolResult, McpError> {
        let record = self
            .tools
            .get_daily_image(self.grant()?, args.0.date.as_deref(), ImageMode::Links)
            .await?;
        json_result(&record)
    }

    #[tool(description = "Get NASA Astronomy Picture of the Day with the image embedded as base64")]
    async fn get_daily_image_with_embedded_image(
        &self,
        args: Parameters<DailyImageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let record = self
            .tools
            .get_daily_image(self.grant()?, args.0.date.as_deref(), ImageMode::Embedded)
            .await?;
        json_result(&record)
    }

    #[tool(description = "Get planetary information: gravity, density and moons")]
    async fn get_planet(&self, args: Parameters<PlanetArgs>) -> Result<CallToolResult, McpError> {
        let record = self.tools.get_planet(self.grant()?, &args.0.planet_name).await?;
        json_result(&record)
    }
}

#[allow(clippy::manual_async_fn)]
impl ServerHandler for AstroServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("NASA Astronomy MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(env!("CARGO_PKG_DESCRIPTION").to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NASA astronomy tools: the Astronomy Picture of the Day (as links or with the \
                 image embedded) and facts about solar-system planets."
                    .into(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async {
            Ok(ListToolsResult {
                tools: self.tool_router.list_all(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let grant = request_grant(&context).ok_or_else(|| {
                tracing::warn!(tool = %request.name, "Tool call without access grant");
                missing_grant()
            })?;
            let server = self.with_grant(grant);
            let ctx = ToolCallContext::new(&server, request, context);
            server.tool_router.call(ctx).await
        }
    }
}
