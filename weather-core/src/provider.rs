use crate::{
    Config, Coordinates, LocationQuery, UnitSystem,
    error::ProviderError,
    provider::{openuv::OpenUvProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

pub mod openuv;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    OpenUv,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::OpenUv => "openuv",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::OpenUv]
    }

    /// Environment variable that overrides the configured API key.
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
            ProviderId::OpenUv => "OPENUV_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "https://api.openweathermap.org",
            ProviderId::OpenUv => "https://api.openuv.io",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "openuv" => Ok(ProviderId::OpenUv),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, openuv."
            )),
        }
    }
}

/// Current conditions as reported by the primary provider.
///
/// Every field the report needs is required here, so a payload without one fails to decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub timezone: i32,
    pub sys: SunTimes,
    pub wind: Wind,
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    pub main: Readings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SunTimes {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub main: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Readings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
}

/// First stage: current conditions for a named location.
#[async_trait]
pub trait PrimaryWeatherProvider: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentConditions, ProviderError>;
}

/// Second stage: UV index at coordinates produced by the first stage.
#[async_trait]
pub trait UvIndexProvider: Send + Sync + Debug {
    async fn uv_index(&self, at: Coordinates) -> Result<f64, ProviderError>;
}

pub fn primary_provider_from_config(config: &Config, http: reqwest::Client) -> OpenWeatherProvider {
    OpenWeatherProvider::new(
        config.provider_api_key(ProviderId::OpenWeather).unwrap_or_default().to_owned(),
        config.provider_base_url(ProviderId::OpenWeather).to_owned(),
        http,
    )
}

pub fn uv_provider_from_config(config: &Config, http: reqwest::Client) -> OpenUvProvider {
    OpenUvProvider::new(
        config.provider_api_key(ProviderId::OpenUv).unwrap_or_default().to_owned(),
        config.provider_base_url(ProviderId::OpenUv).to_owned(),
        http,
    )
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("weatherapi").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn providers_from_config_use_configured_keys() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OW_KEY".to_string());

        let primary = primary_provider_from_config(&cfg, reqwest::Client::new());
        let uv = uv_provider_from_config(&cfg, reqwest::Client::new());

        assert_eq!(primary.api_key(), "OW_KEY");
        // Missing keys are not rejected up front.
        assert_eq!(uv.api_key(), "");
        assert_eq!(uv.base_url(), "https://api.openuv.io");
    }

    #[test]
    fn current_conditions_require_every_block() {
        let json = serde_json::json!({
            "name": "Redmond",
            "timezone": -25200,
            "sys": { "country": "US", "sunrise": 1, "sunset": 2 },
            "coord": { "lat": 47.67, "lon": -122.12 },
            "weather": [],
            "main": { "temp": 1.0, "feels_like": 1.0, "humidity": 50, "pressure": 1000 }
        });

        let err = serde_json::from_value::<CurrentConditions>(json).unwrap_err();
        assert!(err.to_string().contains("wind"));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
