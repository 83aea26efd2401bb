//! APOD payload → [`DailyImageRecord`].

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Title used when the upstream record has none.
pub const UNTITLED: &str = "Untitled";

// =============================================================================
// Upstream shape
// =============================================================================

/// The fields of an APOD response this server consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApodPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hdurl: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Media kind of an APOD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("image") => MediaKind::Image,
            Some("video") => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

impl ApodPayload {
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::parse(self.media_type.as_deref())
    }
}

// =============================================================================
// Embedded image state
// =============================================================================

/// Embedded image slot of a [`DailyImageRecord`].
///
/// `NotRequested` is omitted from the serialized record, `Unavailable`
/// serializes as `null`, `Encoded` as the base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmbeddedImage {
    #[default]
    NotRequested,
    Unavailable,
    Encoded(String),
}

impl EmbeddedImage {
    pub fn is_not_requested(&self) -> bool {
        matches!(self, EmbeddedImage::NotRequested)
    }

    pub fn as_base64(&self) -> Option<&str> {
        match self {
            EmbeddedImage::Encoded(data) => Some(data),
            _ => None,
        }
    }
}

impl Serialize for EmbeddedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EmbeddedImage::Encoded(data) => serializer.serialize_str(data),
            EmbeddedImage::NotRequested | EmbeddedImage::Unavailable => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// Stable output schema of the daily image tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyImageRecord {
    pub title: String,
    pub date: Option<String>,
    pub explanation: Option<String>,
    pub media_type: Option<String>,
    /// Best reference to show: the image itself, or the thumbnail of a video.
    pub display_url: Option<String>,
    /// High-definition image when available, otherwise the primary URL.
    pub page_url: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "EmbeddedImage::is_not_requested")]
    pub image_base64: EmbeddedImage,
}

/// Map an APOD payload onto the stable record.
pub fn daily_image_record(payload: ApodPayload, image: EmbeddedImage) -> DailyImageRecord {
    let display_url = match payload.media_kind() {
        MediaKind::Image => payload.url.clone(),
        MediaKind::Video => payload.thumbnail_url.clone(),
        MediaKind::Other => None,
    };
    let page_url = payload.hdurl.clone().or_else(|| payload.url.clone());

    DailyImageRecord {
        title: payload.title.unwrap_or_else(|| UNTITLED.to_string()),
        date: payload.date,
        explanation: payload.explanation,
        media_type: payload.media_type,
        display_url,
        page_url,
        url: payload.url,
        hdurl: payload.hdurl,
        thumbnail: payload.thumbnail_url,
        image_base64: image,
    }
}
