//! Core types for the astro tool server.
//!
//! - **Errors**: internal error enum and the caller-facing `ToolError`
//! - **Config**: server, auth, upstream and observability settings
//! - **IDs**: per-call correlation identifiers

mod config;
mod errors;
mod ids;

pub use config::{
    AuthConfig, Config, ObservabilityConfig, ServerConfig, UpstreamConfig, DEFAULT_APOD_URL,
    DEFAULT_PLANETS_URL,
};
pub use errors::{Error, Result, ToolError, ToolErrorKind};
pub use ids::CallId;
