use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::ProviderError,
    model::{LocationQuery, UnitSystem},
    provider::{CurrentConditions, ProviderId, truncate_body},
};

use super::PrimaryWeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PrimaryWeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentConditions, ProviderError> {
        let provider = ProviderId::OpenWeather;
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);
        let search = query.search_term();

        debug!(%url, q = %search, %units, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", search.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", units.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::transport(provider, source))?;

        let status = res.status();
        debug!(%status, "current weather response");

        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::transport(provider, source))?;

        if !status.is_success() {
            return Err(ProviderError::Status { provider, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { provider, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn redmond_json() -> serde_json::Value {
        serde_json::json!({
            "coord": { "lon": -122.1215, "lat": 47.674 },
            "weather": [
                { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
            ],
            "main": {
                "temp": 12.3, "feels_like": 11.1, "temp_min": 10.0, "temp_max": 14.0,
                "pressure": 1018, "humidity": 71
            },
            "wind": { "speed": 3.6, "deg": 200 },
            "sys": { "country": "US", "sunrise": 1700000000, "sunset": 1700035000 },
            "timezone": -28800,
            "name": "Redmond",
            "cod": 200
        })
    }

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("OW_KEY".into(), server.uri(), Client::new())
    }

    #[tokio::test]
    async fn sends_location_key_and_units() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Redmond,WA,US"))
            .and(query_param("appid", "OW_KEY"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(redmond_json()))
            .expect(1)
            .mount(&server)
            .await;

        let conditions = provider(&server)
            .current_conditions(&LocationQuery::new("Redmond", "WA"), UnitSystem::Imperial)
            .await
            .unwrap();

        assert_eq!(conditions.name, "Redmond");
        assert_eq!(conditions.sys.country, "US");
        assert_eq!(conditions.coord.lat, 47.674);
        assert_eq!(conditions.weather[0].icon, "04d");
        assert_eq!(conditions.main.pressure, 1018);
        assert_eq!(conditions.timezone, -28800);
    }

    #[tokio::test]
    async fn not_found_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .current_conditions(&LocationQuery::new("Atlantis", "ZZ"), UnitSystem::Metric)
            .await
            .unwrap_err();

        match err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("city not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_block_is_decode_error() {
        let server = MockServer::start().await;
        let mut body = redmond_json();
        body.as_object_mut().unwrap().remove("coord");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = provider(&server)
            .current_conditions(&LocationQuery::new("Redmond", "WA"), UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn connection_failure_does_not_expose_api_key() {
        // Nothing listens on port 1.
        let p = OpenWeatherProvider::new("SECRET_KEY".into(), "http://127.0.0.1:1".into(), Client::new());

        let err = p
            .current_conditions(&LocationQuery::new("Redmond", "WA"), UnitSystem::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Transport { .. }));
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert!(chain.contains("request to openweather failed"));
        assert!(!chain.contains("SECRET_KEY"), "credential leaked: {chain}");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let p = OpenWeatherProvider::new(String::new(), "http://host/".into(), Client::new());
        assert_eq!(p.base_url(), "http://host");
    }
}
