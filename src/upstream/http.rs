//! `reqwest`-backed [`AstronomySource`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};
use std::fmt;

use super::{AstronomySource, APOD_UNAVAILABLE, PLANET_NOT_FOUND};
use crate::normalize::{ApodPayload, PlanetPayload};
use crate::types::{Error, Result, UpstreamConfig};

/// HTTP client for the public APOD and planet endpoints.
///
/// One shared `reqwest::Client` with the configured per-request timeout.
#[derive(Clone)]
pub struct HttpSource {
    http: Client,
    apod_url: Url,
    planets_url: Url,
    api_key: String,
}

impl HttpSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            apod_url: parse_url(&config.apod_url)?,
            planets_url: parse_url(&config.planets_url)?,
            api_key: config.nasa_api_key.clone(),
        })
    }

    fn apod_request_url(&self, date: Option<&str>) -> Url {
        let mut url = self.apod_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            query.append_pair("thumbs", "True");
            if let Some(date) = date {
                query.append_pair("date", date);
            }
        }
        url
    }

    fn planet_request_url(&self, name: &str) -> Result<Url> {
        let mut url = self.planets_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::internal("planet endpoint cannot take a path"))?
            .pop_if_empty()
            .push(&name.to_lowercase());
        Ok(url)
    }
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource")
            .field("apod_url", &self.apod_url.as_str())
            .field("planets_url", &self.planets_url.as_str())
            .finish_non_exhaustive()
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::config(format!("invalid upstream url '{}': {}", raw, e)))
}

#[async_trait]
impl AstronomySource for HttpSource {
    async fn daily_image(&self, date: Option<String>) -> Result<ApodPayload> {
        let url = self.apod_request_url(date.as_deref());
        tracing::debug!(date = ?date, "Fetching APOD entry");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "APOD endpoint rejected request");
            return Err(Error::invalid_input(APOD_UNAVAILABLE));
        }

        Ok(response.json::<ApodPayload>().await?)
    }

    async fn image_bytes(&self, url: String) -> Result<Bytes> {
        tracing::debug!(%url, "Fetching APOD image bytes");

        let response = self.http.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::internal(format!("image fetch returned {}", status)));
        }

        Ok(response.bytes().await?)
    }

    async fn planet(&self, name: String) -> Result<PlanetPayload> {
        let url = self.planet_request_url(&name)?;
        tracing::debug!(planet = %name, "Fetching planet facts");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::invalid_input(PLANET_NOT_FOUND));
        }
        if !status.is_success() {
            tracing::warn!(%status, planet = %name, "Planet endpoint returned an error");
            return Err(Error::internal(format!("planet service returned {}", status)));
        }

        Ok(response.json::<PlanetPayload>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn source(planets_url: &str) -> HttpSource {
        HttpSource::new(&UpstreamConfig {
            apod_url: "https://api.example/planetary/apod".into(),
            planets_url: planets_url.into(),
            nasa_api_key: "KEY".into(),
            request_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn test_apod_url_carries_key_and_thumbs() {
        let src = source("https://bodies.example/rest/bodies");
        assert_eq!(
            src.apod_request_url(None).as_str(),
            "https://api.example/planetary/apod?api_key=KEY&thumbs=True"
        );
        assert_eq!(
            src.apod_request_url(Some("2024-02-29")).as_str(),
            "https://api.example/planetary/apod?api_key=KEY&thumbs=True&date=2024-02-29"
        );
    }

    #[test]
    fn test_planet_url_is_lowercased_and_escaped() {
        let src = source("https://bodies.example/rest/bodies");
        assert_eq!(
            src.planet_request_url("Mars").unwrap().as_str(),
            "https://bodies.example/rest/bodies/mars"
        );
        assert_eq!(
            src.planet_request_url("La Lune/x").unwrap().as_str(),
            "https://bodies.example/rest/bodies/la%20lune%2Fx"
        );
    }

    #[test]
    fn test_planet_url_tolerates_trailing_slash() {
        let src = source("https://bodies.example/rest/bodies/");
        assert_eq!(
            src.planet_request_url("venus").unwrap().as_str(),
            "https://bodies.example/rest/bodies/venus"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let src = source("https://bodies.example/rest/bodies");
        assert!(!format!("{:?}", src).contains("KEY"));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpSource::new(&UpstreamConfig {
            apod_url: "not a url".into(),
            ..UpstreamConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
