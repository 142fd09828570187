//! Core library for the `weather-report` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the current-weather and UV index providers
//! - The aggregator that merges both into one [`WeatherReport`]
//! - Pure formatting helpers (compass labels, local sun times)
//!
//! It is used by `weather-report-cli`, but can also be reused by other front ends.

pub mod aggregator;
pub mod board;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;

pub use aggregator::WeatherAggregator;
pub use board::{Applied, ReportBoard, RequestTicket};
pub use config::{Config, ProviderConfig};
pub use error::{AggregationError, MissingField, ProviderError};
pub use model::{Coordinates, LocationQuery, UnitSystem, WeatherReport};
pub use provider::{PrimaryWeatherProvider, ProviderId, UvIndexProvider};
