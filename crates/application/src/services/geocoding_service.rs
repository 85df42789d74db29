//! Geocoding service
//!
//! Cache-aside façade over [`GeocodingPort`]. A lookup first consults the
//! cache; on a miss (or any cache failure) it asks the vendors and writes the
//! answer back. Cache problems are logged and never reach the caller.

use std::{fmt, sync::Arc, time::Duration};

use domain::{
    Address, DEFAULT_ZOOM, GeocodeConfig, LanguageTag, Location, ReverseGeocodeConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::{
    error::ApplicationError,
    ports::{CachePort, CachePortExt, GeocodingPort, create_cache_key, ttl},
};

const GEOCODE_KEY_PREFIX: &str = "geocode";
const REVERSE_GEOCODE_KEY_PREFIX: &str = "reverse_geocode";

const fn default_limit() -> u32 {
    1
}

/// Forward lookup request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingInput {
    /// Free-text address, used verbatim as part of the cache key
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    /// Maximum number of candidates; 0 is treated as 1
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl GeocodingInput {
    /// Request a single best match for `address`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            limit: default_limit(),
        }
    }

    /// Override the candidate limit
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Reverse lookup request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodingInput {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ReverseGeocodingInput {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            limit: default_limit(),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// A single coordinate in a forward lookup response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOutput {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Location> for PointOutput {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.lat(),
            longitude: location.lng(),
        }
    }
}

/// Forward lookup response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingOutput {
    pub count: usize,
    pub data: Vec<PointOutput>,
}

impl From<Vec<Location>> for GeocodingOutput {
    fn from(locations: Vec<Location>) -> Self {
        let data: Vec<PointOutput> = locations.into_iter().map(PointOutput::from).collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

/// A single postal address in a reverse lookup response
///
/// Every field is always present; an empty string means the vendor did not
/// report it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressOutput {
    pub formatted_address: String,
    pub street: String,
    pub house_number: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
    pub state_code: String,
    pub state_district: String,
    pub county: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
}

impl From<Address> for AddressOutput {
    fn from(address: Address) -> Self {
        Self {
            formatted_address: address.formatted_address,
            street: address.street,
            house_number: address.house_number,
            suburb: address.suburb,
            postcode: address.postcode,
            state: address.state,
            state_code: address.state_code,
            state_district: address.state_district,
            county: address.county,
            country: address.country,
            country_code: address.country_code,
            city: address.city,
        }
    }
}

/// Reverse lookup response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodingOutput {
    pub count: usize,
    pub data: Vec<AddressOutput>,
}

impl From<Vec<Address>> for ReverseGeocodingOutput {
    fn from(addresses: Vec<Address>) -> Self {
        let data: Vec<AddressOutput> = addresses.into_iter().map(AddressOutput::from).collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Cache key for a forward lookup: `geocode.<address>`
pub fn geocode_cache_key(address: &str) -> String {
    create_cache_key(&[GEOCODE_KEY_PREFIX, address])
}

/// Cache key for a reverse lookup: `reverse_geocode.<lat>.<lng>`
pub fn reverse_geocode_cache_key(location: Location) -> String {
    create_cache_key(&[
        REVERSE_GEOCODE_KEY_PREFIX.to_string(),
        location.lat().to_string(),
        location.lng().to_string(),
    ])
}

/// Geocoding service with read-through caching
pub struct GeocodingService {
    geocoder: Arc<dyn GeocodingPort>,
    cache: Arc<dyn CachePort>,
    ttl: Duration,
}

impl fmt::Debug for GeocodingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodingService")
            .field("cache", &self.cache)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl GeocodingService {
    /// Create a service that caches results for [`ttl::GEOCODE`]
    pub fn new(geocoder: Arc<dyn GeocodingPort>, cache: Arc<dyn CachePort>) -> Self {
        Self {
            geocoder,
            cache,
            ttl: ttl::GEOCODE,
        }
    }

    /// Override how long results stay cached
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// TTL applied to written-back results
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Vendor names in rotation order
    pub fn provider_names(&self) -> Vec<String> {
        self.geocoder.provider_names()
    }

    /// Resolve an address into coordinates
    ///
    /// # Errors
    ///
    /// [`ApplicationError::Validation`] for an empty address, and whatever the
    /// geocoding port reports when the cache has no answer, most notably
    /// [`ApplicationError::GeocodeProvidersUnavailable`].
    #[instrument(skip(self, input), fields(address = %input.address, limit = input.limit))]
    pub async fn geocode(
        &self,
        input: GeocodingInput,
        lang: LanguageTag,
    ) -> Result<GeocodingOutput, ApplicationError> {
        input.validate()?;
        info!(lang = %lang, "Geocoding address");

        let key = geocode_cache_key(&input.address);
        if let Some(cached) = self.read_cached::<Vec<Location>>(&key).await {
            return Ok(GeocodingOutput::from(cached));
        }

        let config = GeocodeConfig::new(lang, input.limit);
        let locations = self.geocoder.geocode(&input.address, &config).await?;

        self.write_back(&key, &locations).await;
        Ok(GeocodingOutput::from(locations))
    }

    /// Resolve coordinates into postal addresses
    ///
    /// Lookups always ask for street-level detail (zoom 18).
    ///
    /// # Errors
    ///
    /// [`ApplicationError::Validation`] for out-of-range coordinates, and
    /// whatever the geocoding port reports when the cache has no answer.
    #[instrument(skip(self, input), fields(latitude = input.latitude, longitude = input.longitude))]
    pub async fn reverse_geocode(
        &self,
        input: ReverseGeocodingInput,
        lang: LanguageTag,
    ) -> Result<ReverseGeocodingOutput, ApplicationError> {
        input.validate()?;
        let location = Location::new(input.latitude, input.longitude)?;
        info!(lang = %lang, "Reverse geocoding location");

        let key = reverse_geocode_cache_key(location);
        if let Some(cached) = self.read_cached::<Vec<Address>>(&key).await {
            return Ok(ReverseGeocodingOutput::from(cached));
        }

        let config = ReverseGeocodeConfig::new(lang, input.limit, DEFAULT_ZOOM);
        let addresses = self.geocoder.reverse_geocode(location, &config).await?;

        self.write_back(&key, &addresses).await;
        Ok(ReverseGeocodingOutput::from(addresses))
    }

    async fn read_cached<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        match self.cache.get::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Geocoding cache hit");
                Some(value)
            },
            Ok(None) => {
                debug!(key, "Geocoding cache miss");
                None
            },
            Err(e) => {
                warn!(key, error = %e, "Geocoding cache read failed, querying providers");
                None
            },
        }
    }

    async fn write_back<T>(&self, key: &str, value: &T)
    where
        T: Serialize + Send + Sync,
    {
        if let Err(e) = self.cache.set(key, value, self.ttl).await {
            warn!(key, error = %e, "Failed to cache geocoding result");
        }
    }
}
