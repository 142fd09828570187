use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ProviderError,
    model::Coordinates,
    provider::{ProviderId, truncate_body},
};

use super::UvIndexProvider;

const UV_PATH: &str = "/api/v1/uv";
const ACCESS_TOKEN_HEADER: &str = "x-access-token";

#[derive(Debug, Clone)]
pub struct OpenUvProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenUvProvider {
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

#[derive(Debug, Deserialize)]
struct UvResponse {
    result: Option<UvResult>,
}

#[derive(Debug, Deserialize)]
struct UvResult {
    uv: Option<f64>,
}

#[async_trait]
impl UvIndexProvider for OpenUvProvider {
    async fn uv_index(&self, at: Coordinates) -> Result<f64, ProviderError> {
        let provider = ProviderId::OpenUv;
        let url = format!("{}{}", self.base_url, UV_PATH);

        debug!(%url, lat = at.lat, lng = at.lon, "requesting UV index");

        let res = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, self.api_key.as_str())
            .query(&[("lat", at.lat), ("lng", at.lon)])
            .send()
            .await
            .map_err(|source| ProviderError::transport(provider, source))?;

        let status = res.status();
        debug!(%status, "UV index response");

        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::transport(provider, source))?;

        if !status.is_success() {
            return Err(ProviderError::Status { provider, status, body: truncate_body(&body) });
        }

        let parsed: UvResponse =
            serde_json::from_str(&body).map_err(|source| ProviderError::Decode { provider, source })?;

        parsed
            .result
            .and_then(|r| r.uv)
            .ok_or(ProviderError::MissingField { provider, field: "result.uv" })
    }
}
