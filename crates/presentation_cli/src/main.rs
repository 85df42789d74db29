//! Wayfinder CLI
//!
//! Command-line front end for geocoding lookups with vendor failover and
//! caching.

#![allow(clippy::print_stdout)]

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use application::{GeocodingInput, GeocodingPort, GeocodingService, ReverseGeocodingInput};
use clap::{Parser, Subcommand};
use domain::LanguageTag;
use infrastructure::{
    AppConfig, CacheBackend, GeocodingAdapter, RedbCache, build_cache, init_telemetry,
};
use tracing::debug;

/// Wayfinder CLI
#[derive(Debug, Parser)]
#[command(name = "wayfinder-cli")]
#[command(author, version, about = "Geocoding with vendor failover", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "WAYFINDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an address into coordinates
    ///
    /// Example: wayfinder-cli geocode "1600 Amphitheatre Parkway"
    Geocode {
        /// Free-text address
        address: String,

        /// Maximum number of candidates
        #[arg(short, long, default_value_t = 1)]
        limit: u32,

        /// Preferred result language (BCP-47)
        #[arg(long, default_value = "en")]
        lang: LanguageTag,
    },

    /// Resolve coordinates into postal addresses
    ///
    /// Example: wayfinder-cli reverse 52.5186 13.4081
    #[command(allow_negative_numbers = true)]
    Reverse {
        /// Latitude in degrees
        latitude: f64,

        /// Longitude in degrees
        longitude: f64,

        /// Maximum number of candidates
        #[arg(short, long, default_value_t = 1)]
        limit: u32,

        /// Preferred result language (BCP-47)
        #[arg(long, default_value = "en")]
        lang: LanguageTag,
    },

    /// List configured vendors in rotation order
    Providers,

    /// Remove expired entries from the redb cache
    PruneCache,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    config.validate()?;
    Ok(config)
}

fn build_service(config: &AppConfig) -> anyhow::Result<GeocodingService> {
    let adapter = GeocodingAdapter::from_config(&config.geocoding)?;
    let cache = build_cache(&config.cache)?;
    Ok(GeocodingService::new(Arc::new(adapter), cache).with_ttl(config.cache.ttl()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_telemetry(&config.telemetry)?;
    debug!(command = ?cli.command, "Starting");

    match cli.command {
        Commands::Geocode {
            address,
            limit,
            lang,
        } => {
            let service = build_service(&config)?;
            let output = service
                .geocode(GeocodingInput::new(address).with_limit(limit), lang)
                .await?;
            print_json(&output)?;
        },

        Commands::Reverse {
            latitude,
            longitude,
            limit,
            lang,
        } => {
            let service = build_service(&config)?;
            let input = ReverseGeocodingInput::new(latitude, longitude).with_limit(limit);
            let output = service.reverse_geocode(input, lang).await?;
            print_json(&output)?;
        },

        Commands::Providers => {
            let adapter = GeocodingAdapter::from_config(&config.geocoding)?;
            print_json(&serde_json::json!({ "providers": adapter.provider_names() }))?;
        },

        Commands::PruneCache => {
            if config.cache.backend != CacheBackend::Redb {
                bail!("prune-cache requires the redb cache backend");
            }
            let cache = RedbCache::new(&config.cache.path)?;
            let removed = cache.cleanup_expired()?;
            print_json(&serde_json::json!({ "removed": removed }))?;
        },
    }

    Ok(())
}
