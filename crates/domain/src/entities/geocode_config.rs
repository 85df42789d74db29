//! Per-call lookup options

use serde::{Deserialize, Serialize};

use crate::value_objects::LanguageTag;

/// Zoom level requested for reverse lookups (building/street granularity)
pub const DEFAULT_ZOOM: u8 = 18;

/// Options for forward geocoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Preferred response language
    #[serde(default)]
    pub lang: LanguageTag,
    /// Maximum number of results (at least 1)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_limit() -> u32 {
    1
}

impl GeocodeConfig {
    /// Create options, coercing a zero limit to 1
    #[must_use]
    pub fn new(lang: LanguageTag, limit: u32) -> Self {
        Self {
            lang,
            limit: limit.max(1),
        }
    }

    /// Limit with the `>= 1` invariant applied
    #[must_use]
    pub const fn effective_limit(&self) -> u32 {
        if self.limit == 0 { 1 } else { self.limit }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self::new(LanguageTag::default(), default_limit())
    }
}

/// Options for reverse geocoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseGeocodeConfig {
    /// Preferred response language
    #[serde(default)]
    pub lang: LanguageTag,
    /// Maximum number of results (at least 1)
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Detail level for vendors that support it (0 means vendor default)
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

const fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

impl ReverseGeocodeConfig {
    /// Create options, coercing a zero limit to 1
    #[must_use]
    pub fn new(lang: LanguageTag, limit: u32, zoom: u8) -> Self {
        Self {
            lang,
            limit: limit.max(1),
            zoom,
        }
    }

    /// Limit with the `>= 1` invariant applied
    #[must_use]
    pub const fn effective_limit(&self) -> u32 {
        if self.limit == 0 { 1 } else { self.limit }
    }

    /// Zoom with the vendor default substituted for 0
    #[must_use]
    pub const fn effective_zoom(&self) -> u8 {
        if self.zoom == 0 { DEFAULT_ZOOM } else { self.zoom }
    }
}

impl Default for ReverseGeocodeConfig {
    fn default() -> Self {
        Self::new(LanguageTag::default(), default_limit(), DEFAULT_ZOOM)
    }
}
