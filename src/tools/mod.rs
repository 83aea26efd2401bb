//! Tool layer: transport-independent dispatcher plus its MCP surface.

pub mod dispatcher;
pub mod server;

pub use dispatcher::{
    AstroTools, ImageMode, APOD_ERROR_PREFIX, DAILY_IMAGE_EMBEDDED_TOOL, DAILY_IMAGE_TOOL,
    PLANET_ERROR_PREFIX, PLANET_TOOL, VALIDATE_TOOL,
};
pub use server::{AstroServer, DailyImageArgs, PlanetArgs};
