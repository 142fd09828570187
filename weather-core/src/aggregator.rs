//! Two-stage lookup: current conditions by location, then UV index at the resolved coordinates.
//!
//! Either both stages succeed and a complete [`WeatherReport`] is returned, or the first failing
//! stage's error is returned and nothing else is. The UV stage depends on the coordinates from
//! the weather stage, so the two never run concurrently.

use std::{future::Future, time::Duration};

use tracing::{debug, warn};

use crate::{
    Config, Coordinates, LocationQuery, UnitSystem, WeatherReport,
    error::{AggregationError, MissingField, ProviderError},
    format::icon_url,
    provider::{
        CurrentConditions, PrimaryWeatherProvider, ProviderId, UvIndexProvider,
        openuv::OpenUvProvider, openweather::OpenWeatherProvider, primary_provider_from_config,
        uv_provider_from_config,
    },
};

#[derive(Debug, Clone)]
pub struct WeatherAggregator<P, U> {
    primary: P,
    uv: U,
    stage_timeout: Duration,
}

impl WeatherAggregator<OpenWeatherProvider, OpenUvProvider> {
    /// Build the OpenWeather + OpenUV pipeline from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let http = reqwest::Client::new();
        Self::new(
            primary_provider_from_config(config, http.clone()),
            uv_provider_from_config(config, http),
            config.request_timeout(),
        )
    }
}

impl<P, U> WeatherAggregator<P, U>
where
    P: PrimaryWeatherProvider,
    U: UvIndexProvider,
{
    pub fn new(primary: P, uv: U, stage_timeout: Duration) -> Self {
        Self { primary, uv, stage_timeout }
    }

    pub async fn fetch_report(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<WeatherReport, AggregationError> {
        validate(query)?;

        let conditions = self
            .stage(ProviderId::OpenWeather, self.primary.current_conditions(query, units))
            .await
            .map_err(|source| {
                warn!(location = %query, error = %source, "weather lookup failed");
                if source.is_malformed() {
                    AggregationError::MalformedResponse { source }
                } else {
                    AggregationError::PrimaryProvider { location: query.to_string(), source }
                }
            })?;

        let partial = PartialReport::extract(conditions, units)
            .map_err(|source| AggregationError::MalformedResponse { source })?;

        debug!(name = %partial.name, lat = partial.lat, lon = partial.lon, "resolved location");

        let uv_index = self
            .stage(ProviderId::OpenUv, self.uv.uv_index(partial.coordinates()))
            .await
            .map_err(|source| {
                warn!(location = %query, error = %source, "UV index lookup failed");
                AggregationError::SecondaryProvider { source }
            })?;

        Ok(partial.complete(uv_index))
    }

    async fn stage<T, F>(&self, provider: ProviderId, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::time::timeout(self.stage_timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout { provider, after: self.stage_timeout })?
    }
}

fn validate(query: &LocationQuery) -> Result<(), AggregationError> {
    if query.city.trim().is_empty() {
        return Err(AggregationError::Validation { missing_field: MissingField::City });
    }
    if query.region_code.trim().is_empty() {
        return Err(AggregationError::Validation { missing_field: MissingField::RegionCode });
    }
    Ok(())
}

/// Everything from the weather stage, waiting for the UV value.
#[derive(Debug)]
struct PartialReport {
    name: String,
    country: String,
    lat: f64,
    lon: f64,
    units: UnitSystem,
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
    wind_speed: f64,
    wind_direction_deg: f64,
    sunrise: i64,
    sunset: i64,
    timezone_offset_seconds: i32,
    condition_summary: String,
    icon_ref: String,
}

impl PartialReport {
    fn extract(conditions: CurrentConditions, units: UnitSystem) -> Result<Self, ProviderError> {
        let condition = conditions.weather.into_iter().next().ok_or(ProviderError::MissingField {
            provider: ProviderId::OpenWeather,
            field: "weather[0]",
        })?;

        Ok(Self {
            name: conditions.name,
            country: conditions.sys.country,
            lat: conditions.coord.lat,
            lon: conditions.coord.lon,
            units,
            temp: conditions.main.temp,
            feels_like: conditions.main.feels_like,
            humidity: conditions.main.humidity,
            pressure: conditions.main.pressure,
            wind_speed: conditions.wind.speed,
            wind_direction_deg: conditions.wind.deg,
            sunrise: conditions.sys.sunrise,
            sunset: conditions.sys.sunset,
            timezone_offset_seconds: conditions.timezone,
            condition_summary: condition.main,
            icon_ref: icon_url(&condition.icon),
        })
    }

    fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }

    fn complete(self, uv_index: f64) -> WeatherReport {
        WeatherReport {
            name: self.name,
            country: self.country,
            lat: self.lat,
            lon: self.lon,
            units: self.units,
            temp: self.temp,
            feels_like: self.feels_like,
            humidity: self.humidity,
            pressure: self.pressure,
            wind_speed: self.wind_speed,
            wind_direction_deg: self.wind_direction_deg,
            sunrise: self.sunrise,
            sunset: self.sunset,
            timezone_offset_seconds: self.timezone_offset_seconds,
            condition_summary: self.condition_summary,
            icon_ref: self.icon_ref,
            uv_index,
        }
    }
}
