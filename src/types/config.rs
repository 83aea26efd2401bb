//! Configuration structures.
//!
//! Configuration is assembled once at startup (the binary reads it from the
//! environment and command line) and is immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use super::{Error, Result};

/// Default public APOD endpoint.
pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Default planetary bodies endpoint.
pub const DEFAULT_PLANETS_URL: &str = "https://api.le-systeme-solaire.net/rest/bodies";

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer gate and caller identity.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Upstream data providers.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.server
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| Error::config(format!("invalid listen address '{}': {}", self.server.listen_addr, e)))?;
        if !self.server.mcp_path.starts_with('/') || self.server.mcp_path == "/" {
            return Err(Error::config("mcp path must start with '/' and name a sub-path"));
        }
        if self.auth.bearer_token.is_empty() {
            return Err(Error::config("bearer token must be set (AUTH_TOKEN)"));
        }
        if self.auth.caller_identity.is_empty() {
            return Err(Error::config("caller identity must be set (MY_NUMBER)"));
        }
        if self.upstream.nasa_api_key.is_empty() {
            return Err(Error::config("NASA API key must be set (NASA_API_KEY)"));
        }
        for url in [&self.upstream.apod_url, &self.upstream.planets_url] {
            reqwest::Url::parse(url)
                .map_err(|e| Error::config(format!("invalid upstream url '{}': {}", url, e)))?;
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the streamable-HTTP transport.
    pub listen_addr: String,

    /// Path the MCP service is mounted under.
    pub mcp_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8086".to_string(),
            mcp_path: "/mcp".to_string(),
        }
    }
}

/// Bearer gate configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The single accepted bearer token.
    pub bearer_token: String,

    /// Subject recorded on every issued grant.
    pub subject: String,

    /// Identifier returned by the `validate` tool.
    pub caller_identity: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bearer_token: String::new(),
            subject: "astro-client".to_string(),
            caller_identity: String::new(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_token", &"<redacted>")
            .field("subject", &self.subject)
            .field("caller_identity", &self.caller_identity)
            .finish()
    }
}

/// Upstream provider configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// APOD endpoint.
    pub apod_url: String,

    /// Planetary bodies endpoint; the planet name is appended as a path segment.
    pub planets_url: String,

    /// API key sent to the APOD endpoint.
    pub nasa_api_key: String,

    /// Per-request timeout applied to every outbound call.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            apod_url: DEFAULT_APOD_URL.to_string(),
            planets_url: DEFAULT_PLANETS_URL.to_string(),
            nasa_api_key: String::new(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("apod_url", &self.apod_url)
            .field("planets_url", &self.planets_url)
            .field("nasa_api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error), used when
    /// `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
