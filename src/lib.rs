//! # astro-mcp: NASA astronomy tools over MCP
//!
//! A small MCP tool server that proxies two public astronomy APIs behind a
//! single bearer token:
//! - `get_daily_image` / `get_daily_image_with_embedded_image`: NASA's
//!   Astronomy Picture of the Day, as links or with the picture base64-embedded
//! - `get_planet`: gravity, density and moons of a solar-system body
//! - `validate`: the configured caller identity
//!
//! ## Architecture
//!
//! Every call is stateless and runs one linear pass:
//! ```text
//!   HTTP ─► auth (bearer → AccessGrant) ─► tools (dispatch) ─► upstream (fetch)
//!                                                │
//!                                                └─► normalize (pure mapping) ─► record
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod auth;
pub mod normalize;
pub mod server;
pub mod tools;
pub mod types;
pub mod upstream;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result, ToolError, ToolErrorKind};
