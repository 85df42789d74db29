//! Yandex Geocoder HTTP API
//!
//! <https://yandex.com/dev/geocode/doc/en/>. Coordinates in `pos` are ordered
//! longitude first.

use domain::{Address, GeocodeConfig, Location, ReverseGeocodeConfig};
use serde::Deserialize;
use url::Url;

use super::{ApiKey, EndpointOverrides, coordinate, decode};
use crate::{
    config::GeocodingClientConfig,
    error::{GeocodingError, ProviderError},
    http_provider::{EndpointBuilder, HttpGeocodingProvider, ResponseParser},
};

/// Provider key used in configuration
pub const PROVIDER_KEY: &str = "yandex";
/// Default forward geocoding endpoint
pub const DEFAULT_GEOCODE_URL: &str = "https://geocode-maps.yandex.ru/1.x";
/// Default reverse geocoding endpoint
pub const DEFAULT_REVERSE_URL: &str = "https://geocode-maps.yandex.ru/1.x";

/// Create a Yandex adapter
///
/// # Errors
///
/// Returns an error if an endpoint URL is invalid or the HTTP client cannot be created.
pub fn provider(
    api_key: &str,
    overrides: &EndpointOverrides,
    config: &GeocodingClientConfig,
) -> Result<HttpGeocodingProvider, GeocodingError> {
    let (geocode_url, reverse_url) = overrides.resolve(DEFAULT_GEOCODE_URL, DEFAULT_REVERSE_URL)?;
    HttpGeocodingProvider::new(
        PROVIDER_KEY,
        YandexEndpoints {
            api_key: ApiKey::new(api_key),
            geocode_url,
            reverse_url,
        },
        YandexParser,
        config,
    )
}

/// Yandex request URLs
#[derive(Debug)]
pub struct YandexEndpoints {
    api_key: ApiKey,
    geocode_url: Url,
    reverse_url: Url,
}

impl EndpointBuilder for YandexEndpoints {
    fn geocode_url(&self, address: &str, config: &GeocodeConfig) -> Url {
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("results", &config.effective_limit().to_string())
            .append_pair("lang", config.lang.as_str())
            .append_pair("format", "json")
            .append_pair("apikey", self.api_key.as_str())
            .append_pair("geocode", address);
        url
    }

    fn reverse_geocode_url(&self, location: Location, config: &ReverseGeocodeConfig) -> Url {
        let point = format!("{},{}", coordinate(location.lat()), coordinate(location.lng()));
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("results", &config.effective_limit().to_string())
            .append_pair("lang", config.lang.as_str())
            .append_pair("format", "json")
            .append_pair("kind", "house")
            .append_pair("apikey", self.api_key.as_str())
            .append_pair("sco", "latlong")
            .append_pair("geocode", &point);
        url
    }
}

mod api {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Envelope<T> {
        pub response: Response<T>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Response<T> {
        #[serde(rename = "GeoObjectCollection")]
        pub collection: Collection<T>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Collection<T> {
        #[serde(rename = "metaDataProperty", default)]
        pub meta: CollectionMeta,
        #[serde(rename = "featureMember", default = "Vec::new")]
        pub members: Vec<Member<T>>,
    }

    impl<T> Collection<T> {
        pub fn nothing_found(&self) -> bool {
            self.meta.response.found == "0" || self.members.is_empty()
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct CollectionMeta {
        #[serde(rename = "GeocoderResponseMetaData", default)]
        pub response: ResponseMeta,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct ResponseMeta {
        #[serde(default)]
        pub found: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Member<T> {
        #[serde(rename = "GeoObject")]
        pub geo_object: T,
    }

    #[derive(Debug, Deserialize)]
    pub struct PointObject {
        #[serde(rename = "Point")]
        pub point: Point,
    }

    #[derive(Debug, Deserialize)]
    pub struct Point {
        pub pos: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct AddressObject {
        #[serde(rename = "metaDataProperty")]
        pub meta: AddressObjectMeta,
    }

    #[derive(Debug, Deserialize)]
    pub struct AddressObjectMeta {
        #[serde(rename = "GeocoderMetaData")]
        pub geocoder: GeocoderMeta,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocoderMeta {
        #[serde(rename = "Address", default)]
        pub address: YandexAddress,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct YandexAddress {
        #[serde(default)]
        pub country_code: String,
        #[serde(default)]
        pub postal_code: String,
        #[serde(default)]
        pub formatted: String,
        #[serde(rename = "Components", default)]
        pub components: Vec<Component>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Component {
        pub kind: String,
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub message: String,
        #[serde(alias = "statusCode")]
        pub status: Option<u16>,
    }
}

/// Parse a `"<lng> <lat>"` position
fn parse_pos(pos: &str) -> Option<Location> {
    let mut parts = pos.split_whitespace();
    let lng = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    Some(Location::new_unchecked(lat, lng))
}

fn to_address(raw: api::YandexAddress) -> Address {
    let mut address = Address {
        formatted_address: raw.formatted,
        postcode: raw.postal_code,
        country_code: raw.country_code,
        ..Default::default()
    };

    for component in raw.components {
        let slot = match component.kind.as_str() {
            "house" => &mut address.house_number,
            "street" => &mut address.street,
            "locality" => &mut address.city,
            "area" => &mut address.state_district,
            "province" => &mut address.state,
            "country" => &mut address.country,
            _ => continue,
        };
        *slot = component.name;
    }

    address
}

/// Yandex response decoding
#[derive(Debug)]
pub struct YandexParser;

impl ResponseParser for YandexParser {
    fn locations(&self, body: &[u8]) -> Result<Vec<Location>, GeocodingError> {
        let envelope: api::Envelope<api::PointObject> = decode(body)?;
        let collection = envelope.response.collection;
        if collection.nothing_found() {
            return Ok(Vec::new());
        }

        Ok(collection
            .members
            .into_iter()
            .filter_map(|member| parse_pos(&member.geo_object.point.pos))
            .collect())
    }

    fn addresses(&self, body: &[u8]) -> Result<Vec<Address>, GeocodingError> {
        let envelope: api::Envelope<api::AddressObject> = decode(body)?;
        let collection = envelope.response.collection;
        if collection.nothing_found() {
            return Ok(Vec::new());
        }

        Ok(collection
            .members
            .into_iter()
            .map(|member| to_address(member.geo_object.meta.geocoder.address))
            .collect())
    }

    fn error(&self, status: u16, body: &[u8]) -> Option<ProviderError> {
        let err: api::ErrorBody = serde_json::from_slice(body).ok()?;
        (!err.message.is_empty())
            .then(|| ProviderError::new(err.status.unwrap_or(status), err.message))
    }
}
