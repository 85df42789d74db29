//! Vendor adapters
//!
//! Each vendor module provides an [`crate::EndpointBuilder`], a
//! [`crate::ResponseParser`] and a `provider` constructor returning a
//! configured [`crate::HttpGeocodingProvider`].

pub mod graphhopper;
pub mod here;
pub mod locationiq;
pub mod nominatim;
pub mod yandex;

use std::fmt;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::GeocodingError;

/// Optional base URL overrides for a vendor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverrides {
    /// Replaces the vendor's forward geocoding URL
    pub geocode_url: Option<String>,
    /// Replaces the vendor's reverse geocoding URL
    pub reverse_url: Option<String>,
}

impl EndpointOverrides {
    /// Point both operations at the same base URL
    #[must_use]
    pub fn both(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            geocode_url: Some(url.clone()),
            reverse_url: Some(url),
        }
    }

    /// Resolve the effective URLs, falling back to the vendor defaults
    pub(crate) fn resolve(
        &self,
        default_geocode: &str,
        default_reverse: &str,
    ) -> Result<(Url, Url), GeocodingError> {
        let geocode = parse_base_url(self.geocode_url.as_deref().unwrap_or(default_geocode))?;
        let reverse = parse_base_url(self.reverse_url.as_deref().unwrap_or(default_reverse))?;
        Ok((geocode, reverse))
    }
}

/// Vendor credential that never shows up in `Debug` output
#[derive(Clone)]
pub(crate) struct ApiKey(String);

impl ApiKey {
    pub(crate) fn new(key: &str) -> Self {
        Self(key.trim().to_string())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn parse_base_url(raw: &str) -> Result<Url, GeocodingError> {
    let url = Url::parse(raw)
        .map_err(|e| GeocodingError::ConfigurationError(format!("invalid URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(GeocodingError::ConfigurationError(format!(
            "URL '{raw}' cannot carry query parameters"
        )));
    }
    Ok(url)
}

/// Decode a JSON body, mapping failures to [`GeocodingError::ParseError`]
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GeocodingError> {
    serde_json::from_slice(body).map_err(|e| GeocodingError::ParseError(e.to_string()))
}

/// Coordinates are sent with six decimal places (about 10 cm)
pub(crate) fn coordinate(value: f64) -> String {
    format!("{value:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_fall_back_to_defaults() {
        let (geocode, reverse) = EndpointOverrides::default()
            .resolve("https://a.example/search", "https://a.example/reverse")
            .unwrap();
        assert_eq!(geocode.path(), "/search");
        assert_eq!(reverse.path(), "/reverse");
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let (geocode, reverse) = EndpointOverrides::both("http://127.0.0.1:8080/mock")
            .resolve("https://a.example/search", "https://a.example/reverse")
            .unwrap();
        assert_eq!(geocode.as_str(), "http://127.0.0.1:8080/mock");
        assert_eq!(reverse, geocode);
    }

    #[test]
    fn test_invalid_override_is_configuration_error() {
        let overrides = EndpointOverrides {
            geocode_url: Some("not a url".to_string()),
            reverse_url: None,
        };
        let result = overrides.resolve("https://a.example", "https://a.example");
        assert!(matches!(result, Err(GeocodingError::ConfigurationError(_))));

        let overrides = EndpointOverrides::both("mailto:someone@example.com");
        let result = overrides.resolve("https://a.example", "https://a.example");
        assert!(matches!(result, Err(GeocodingError::ConfigurationError(_))));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new(" secret ");
        assert_eq!(key.as_str(), "secret");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn test_coordinate_precision() {
        assert_eq!(coordinate(52.52), "52.520000");
        assert_eq!(coordinate(-122.084_123_456), "-122.084123");
    }
}
