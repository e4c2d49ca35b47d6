//! Core library for the `airquality` service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the station data provider (OpenAQ)
//! - PM2.5 extraction and color classification
//! - The request-scoped pipeline tying them together
//!
//! It is used by `airquality-cli`, but can also be reused by other binaries or services.

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod provider;
pub mod service;

pub use classify::ColorBand;
pub use config::{Config, DatabaseConfig, ProviderConfig, ServerConfig};
pub use error::AirQualityError;
pub use model::{AirQualityOutcome, AirQualityQuery, StationReading};
pub use provider::{StationProvider, provider_from_config};
pub use service::AirQualityService;
