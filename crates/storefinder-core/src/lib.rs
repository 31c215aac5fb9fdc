//! Core domain types for storefinder: coordinates, stores, the store
//! catalog, great-circle distance and the nearest-store resolver.
//!
//! Everything in this crate is synchronous and free of I/O except catalog
//! loading and configuration parsing.

mod app_config;
mod catalog;
mod config;
mod coordinate;
mod distance;
mod resolver;
mod store;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, RouteStrategy};
pub use catalog::{load_catalog, Catalog, CatalogFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use coordinate::Coordinate;
pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use resolver::{rank, resolve};
pub use store::{RankedStore, Store};

/// Errors raised by the pure domain operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A coordinate held a non-finite or out-of-range component.
    #[error("invalid coordinate ({lat}, {lng}): {reason}")]
    InvalidCoordinate {
        lat: f64,
        lng: f64,
        reason: &'static str,
    },
}

/// Errors raised while loading configuration or the store catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
