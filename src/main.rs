//! astro-mcp server: main entry point.
//!
//! Reads configuration from the environment (a `.env` file is honoured) and
//! the command line, then serves the MCP tools over streamable HTTP.

use astro_mcp::types::{AuthConfig, Config, ObservabilityConfig, ServerConfig, UpstreamConfig};
use clap::Parser;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "astro-mcp", version, about = "NASA astronomy MCP tool server")]
struct Cli {
    /// Bearer token callers must present.
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    auth_token: String,

    /// Identifier returned by the `validate` tool.
    #[arg(long, env = "MY_NUMBER")]
    caller_identity: String,

    /// API key for the NASA APOD endpoint.
    #[arg(long, env = "NASA_API_KEY", hide_env_values = true)]
    nasa_api_key: String,

    /// Address to bind the HTTP transport to.
    #[arg(long, env = "ASTRO_LISTEN_ADDR", default_value = "0.0.0.0:8086")]
    listen_addr: String,

    /// Path the MCP endpoint is mounted under.
    #[arg(long, env = "ASTRO_MCP_PATH", default_value = "/mcp")]
    mcp_path: String,

    /// Timeout for each upstream request, in seconds.
    #[arg(long, env = "ASTRO_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, env = "ASTRO_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit JSON logs.
    #[arg(long, env = "ASTRO_JSON_LOGS")]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                listen_addr: self.listen_addr,
                mcp_path: self.mcp_path,
            },
            auth: AuthConfig {
                bearer_token: self.auth_token,
                caller_identity: self.caller_identity,
                ..defaults.auth
            },
            upstream: UpstreamConfig {
                nasa_api_key: self.nasa_api_key,
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..defaults.upstream
            },
            observability: ObservabilityConfig {
                log_level: self.log_level,
                json_logs: self.json_logs,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Cli::parse().into_config();
    config.validate()?;

    // Initialize observability
    astro_mcp::observability::init_tracing(&config.observability);
    tracing::info!(?config, "🚀 Starting NASA astronomy MCP server");

    let app = astro_mcp::server::build_router(&config)?;
    let listener = TcpListener::bind(&config.server.listen_addr).await?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
        }
        signal.cancel();
    });

    astro_mcp::server::serve(listener, app, shutdown).await?;
    Ok(())
}
