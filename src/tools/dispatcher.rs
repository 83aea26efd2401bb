//! Tool dispatcher: grant check, fetch, normalize, error boundary.
//!
//! Every operation is a single linear pass with no retries. Whatever fails
//! inside the fetch path is folded into exactly one [`ToolError`] carrying a
//! tool-specific prefix.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

use crate::auth::AccessGrant;
use crate::normalize::{self, DailyImageRecord, EmbeddedImage, MediaKind, PlanetRecord};
use crate::types::{CallId, Error, Result, ToolError};
use crate::upstream::AstronomySource;

pub const VALIDATE_TOOL: &str = "validate";
pub const DAILY_IMAGE_TOOL: &str = "get_daily_image";
pub const DAILY_IMAGE_EMBEDDED_TOOL: &str = "get_daily_image_with_embedded_image";
pub const PLANET_TOOL: &str = "get_planet";

pub const APOD_ERROR_PREFIX: &str = "APOD fetch error: ";
pub const PLANET_ERROR_PREFIX: &str = "Planet fetch error: ";

/// How the daily image operation treats the picture itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Links only; one outbound request.
    Links,
    /// Also download the image and embed it as base64; up to two requests.
    Embedded,
}

impl ImageMode {
    pub fn tool_name(&self) -> &'static str {
        match self {
            ImageMode::Links => DAILY_IMAGE_TOOL,
            ImageMode::Embedded => DAILY_IMAGE_EMBEDDED_TOOL,
        }
    }
}

/// The tool operations, independent of any transport.
#[derive(Clone)]
pub struct AstroTools {
    source: Arc<dyn AstronomySource>,
    caller_identity: String,
}

impl fmt::Debug for AstroTools {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstroTools")
            .field("caller_identity", &self.caller_identity)
            .finish_non_exhaustive()
    }
}

impl AstroTools {
    pub fn new(source: Arc<dyn AstronomySource>, caller_identity: impl Into<String>) -> Self {
        Self {
            source,
            caller_identity: caller_identity.into(),
        }
    }

    /// Return the configured caller identity.
    pub fn validate(&self, grant: &AccessGrant) -> std::result::Result<String, ToolError> {
        authorize(grant, VALIDATE_TOOL)?;
        Ok(self.caller_identity.clone())
    }

    /// Fetch and normalize the APOD entry for `date` (most recent if `None`).
    pub async fn get_daily_image(
        &self,
        grant: &AccessGrant,
        date: Option<&str>,
        mode: ImageMode,
    ) -> std::result::Result<DailyImageRecord, ToolError> {
        let tool = mode.tool_name();
        authorize(grant, tool)?;

        let span = call_span(tool, grant);
        self.fetch_daily_image(date, mode)
            .instrument(span)
            .await
            .map_err(|e| boundary(e, tool, APOD_ERROR_PREFIX))
    }

    /// Fetch and normalize facts about a planet.
    pub async fn get_planet(
        &self,
        grant: &AccessGrant,
        planet_name: &str,
    ) -> std::result::Result<PlanetRecord, ToolError> {
        authorize(grant, PLANET_TOOL)?;

        let span = call_span(PLANET_TOOL, grant);
        self.fetch_planet(planet_name)
            .instrument(span)
            .await
            .map_err(|e| boundary(e, PLANET_TOOL, PLANET_ERROR_PREFIX))
    }

    async fn fetch_daily_image(&self, date: Option<&str>, mode: ImageMode) -> Result<DailyImageRecord> {
        let date = parse_date(date)?;
        let payload = self.source.daily_image(date).await?;

        let image = match mode {
            ImageMode::Links => EmbeddedImage::NotRequested,
            ImageMode::Embedded => self.embed_image(payload.media_kind(), payload.url.as_deref()).await,
        };

        let record = normalize::daily_image_record(payload, image);
        tracing::info!(title = %record.title, date = ?record.date, "APOD entry fetched");
        Ok(record)
    }

    /// Download and encode the picture. Failures are logged and leave the
    /// slot explicitly unavailable; they never fail the call.
    async fn embed_image(&self, kind: MediaKind, url: Option<&str>) -> EmbeddedImage {
        let url = match (kind, url) {
            (MediaKind::Image, Some(url)) => url,
            _ => return EmbeddedImage::Unavailable,
        };

        match self.source.image_bytes(url.to_string()).await {
            Ok(bytes) => EmbeddedImage::Encoded(STANDARD.encode(&bytes)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch image, returning record without it");
                EmbeddedImage::Unavailable
            }
        }
    }

    async fn fetch_planet(&self, planet_name: &str) -> Result<PlanetRecord> {
        let name = planet_name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("Planet name must not be empty"));
        }

        let payload = self.source.planet(name.to_string()).await?;
        let record = normalize::planet_record(payload);
        tracing::info!(planet = ?record.name, moons = record.moons.len(), "Planet facts fetched");
        Ok(record)
    }
}

fn authorize(grant: &AccessGrant, tool: &str) -> std::result::Result<(), ToolError> {
    if grant.permits(tool) {
        Ok(())
    } else {
        tracing::warn!(tool, subject = %grant.subject(), "Grant does not cover tool");
        Err(ToolError::invalid_input(format!("Access denied to tool {}", tool)))
    }
}

fn call_span(tool: &str, grant: &AccessGrant) -> tracing::Span {
    tracing::info_span!("tool_call", tool, call_id = %CallId::new(), subject = %grant.subject())
}

fn boundary(err: Error, tool: &str, prefix: &str) -> ToolError {
    let err = err.into_tool_error(prefix);
    tracing::warn!(tool, kind = err.kind.as_str(), message = %err.message, "Tool call failed");
    err
}

/// Empty means "most recent"; anything else must be an ISO calendar date.
fn parse_date(date: Option<&str>) -> Result<Option<String>> {
    match date.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| Some(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| Error::invalid_input(format!("Invalid date '{}': expected YYYY-MM-DD", raw))),
    }
}
