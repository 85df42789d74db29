//! OpenStreetMap Nominatim
//!
//! <https://nominatim.org/release-docs/latest/api/Overview/>. No API key; the
//! public instance requires an identifying `User-Agent`.

use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{EndpointOverrides, coordinate, decode};
use crate::{
    config::GeocodingClientConfig,
    error::{GeocodingError, ProviderError},
    http_provider::{EndpointBuilder, HttpGeocodingProvider, ResponseParser},
};

/// Provider key used in configuration
pub const PROVIDER_KEY: &str = "osm_nominatim";
/// Default forward geocoding endpoint
pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
/// Default reverse geocoding endpoint
pub const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Create a Nominatim adapter
///
/// # Errors
///
/// Returns an error if an endpoint URL is invalid or the HTTP client cannot be created.
pub fn provider(
    overrides: &EndpointOverrides,
    config: &GeocodingClientConfig,
) -> Result<HttpGeocodingProvider, GeocodingError> {
    let (geocode_url, reverse_url) = overrides.resolve(DEFAULT_GEOCODE_URL, DEFAULT_REVERSE_URL)?;
    HttpGeocodingProvider::new(
        PROVIDER_KEY,
        NominatimEndpoints {
            geocode_url,
            reverse_url,
        },
        NominatimParser,
        config,
    )
}

/// Nominatim request URLs
#[derive(Debug)]
pub struct NominatimEndpoints {
    geocode_url: Url,
    reverse_url: Url,
}

impl EndpointBuilder for NominatimEndpoints {
    fn geocode_url(&self, address: &str, config: &GeocodeConfig) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", address)
            .append_pair("limit", &config.effective_limit().to_string());
        url
    }

    fn reverse_geocode_url(&self, location: Location, config: &ReverseGeocodeConfig) -> Url {
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &coordinate(location.lat()))
            .append_pair("lon", &coordinate(location.lng()))
            .append_pair("zoom", &config.effective_zoom().to_string());
        url
    }
}

/// Wire types shared with Nominatim-compatible vendors
pub(crate) mod api {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Place {
        #[serde(default)]
        pub lat: String,
        #[serde(default)]
        pub lon: String,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct ReverseResponse {
        pub display_name: String,
        pub address: PlaceAddress,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct PlaceAddress {
        pub house_number: String,
        pub road: String,
        pub pedestrian: String,
        pub footway: String,
        pub cycleway: String,
        pub highway: String,
        pub path: String,
        pub suburb: String,
        pub city: String,
        pub town: String,
        pub village: String,
        pub hamlet: String,
        pub county: String,
        pub country: String,
        pub country_code: String,
        pub state: String,
        pub state_district: String,
        pub postcode: String,
    }

    fn first_non_empty<'a>(candidates: &[&'a String]) -> &'a str {
        candidates
            .iter()
            .copied()
            .find(|value| !value.is_empty())
            .map_or("", String::as_str)
    }

    impl PlaceAddress {
        pub fn locality(&self) -> &str {
            first_non_empty(&[&self.city, &self.town, &self.village, &self.hamlet])
        }

        pub fn street(&self) -> &str {
            first_non_empty(&[
                &self.road,
                &self.pedestrian,
                &self.path,
                &self.cycleway,
                &self.footway,
                &self.highway,
            ])
        }
    }
}

/// Response decoding for Nominatim and Nominatim-compatible vendors
#[derive(Debug)]
pub struct NominatimParser;

impl ResponseParser for NominatimParser {
    fn locations(&self, body: &[u8]) -> Result<Vec<Location>, GeocodingError> {
        let places: Vec<api::Place> = decode(body)?;
        Ok(places
            .into_iter()
            .filter_map(|place| {
                let lat = place.lat.parse::<f64>().ok()?;
                let lng = place.lon.parse::<f64>().ok()?;
                Some(Location::new_unchecked(lat, lng))
            })
            .collect())
    }

    fn addresses(&self, body: &[u8]) -> Result<Vec<Address>, GeocodingError> {
        let response: api::ReverseResponse = decode(body)?;
        let a = &response.address;
        let address = Address {
            formatted_address: response.display_name.clone(),
            street: a.street().to_string(),
            house_number: a.house_number.clone(),
            suburb: a.suburb.clone(),
            postcode: a.postcode.clone(),
            state: a.state.clone(),
            state_code: String::new(),
            state_district: a.state_district.clone(),
            county: a.county.clone(),
            country: a.country.clone(),
            country_code: a.country_code.to_uppercase(),
            city: a.locality().to_string(),
        };

        if address.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![address])
    }

    fn error(&self, status: u16, body: &[u8]) -> Option<ProviderError> {
        let value: Value = serde_json::from_slice(body).ok()?;
        match value.get("error")? {
            Value::String(message) => Some(ProviderError::new(status, message.clone())),
            Value::Object(detail) => {
                let message = detail
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                let code = detail
                    .get("code")
                    .and_then(Value::as_u64)
                    .and_then(|code| u16::try_from(code).ok())
                    .unwrap_or(status);
                Some(ProviderError::new(code, message))
            },
            _ => None,
        }
    }
}
