use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DEFAULT_COUNTRY_CODE: &str = "US";

/// Location the user asked about. City and region must be non-empty before a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: String,
    pub region_code: String,
    pub country_code: String,
}

impl LocationQuery {
    /// Build a query with the default country code. Inputs are trimmed.
    pub fn new(city: impl Into<String>, region_code: impl Into<String>) -> Self {
        Self::with_country(city, region_code, DEFAULT_COUNTRY_CODE)
    }

    pub fn with_country(
        city: impl Into<String>,
        region_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into().trim().to_string(),
            region_code: region_code.into().trim().to_string(),
            country_code: country_code.into().trim().to_string(),
        }
    }

    /// The `q` parameter understood by the primary provider: `city,region,country`.
    pub fn search_term(&self) -> String {
        format!("{},{},{}", self.city, self.region_code, self.country_code)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.region_code, self.country_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Normalized result of one aggregation. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub units: UnitSystem,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub timezone_offset_seconds: i32,
    pub condition_summary: String,
    pub icon_ref: String,
    pub uv_index: f64,
}

impl WeatherReport {
    /// Position for the map marker.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }
}
