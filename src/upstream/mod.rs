//! Upstream data providers.
//!
//! [`AstronomySource`] is the seam between the dispatcher and the network:
//! [`HttpSource`] talks to the public APIs, tests substitute a mock.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;

use crate::normalize::{ApodPayload, PlanetPayload};
use crate::types::Result;

pub use http::HttpSource;

/// Message returned when the APOD endpoint rejects a request.
pub const APOD_UNAVAILABLE: &str = "Failed to fetch APOD data";

/// Message returned when the planet endpoint does not know a body.
pub const PLANET_NOT_FOUND: &str =
    "Planet not found. Try: mercury, venus, earth, mars, jupiter, saturn, uranus, neptune";

/// Single-shot access to the two astronomy providers.
///
/// Every method issues exactly one outbound request and never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AstronomySource: Send + Sync {
    /// Fetch the APOD entry for `date` (`YYYY-MM-DD`), or the most recent one.
    async fn daily_image(&self, date: Option<String>) -> Result<ApodPayload>;

    /// Fetch raw image bytes. Any non-success status is an error.
    async fn image_bytes(&self, url: String) -> Result<Bytes>;

    /// Fetch facts for a solar-system body by name.
    async fn planet(&self, name: String) -> Result<PlanetPayload>;
}
