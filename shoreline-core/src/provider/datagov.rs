use async_trait::async_trait;
use reqwest::Client;

use crate::{config::WeatherConfig, error::WeatherError, model::Envelope};

use super::WeatherProvider;

pub const FORECAST_PATH: &str = "/v1/environment/2-hour-weather-forecast";
pub const TEMPERATURE_PATH: &str = "/v1/environment/air-temperature";

/// data.gov.sg environment API. No key, no request body.
#[derive(Debug, Clone)]
pub struct DataGovProvider {
    base_url: String,
    http: Client,
}

impl DataGovProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Build from config, applying the request timeout when one is set.
    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::with_client(config.api_base.clone(), http))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the envelope. The last path segment names the
    /// endpoint in errors.
    async fn fetch_envelope(&self, path: &'static str) -> Result<Envelope, WeatherError> {
        let endpoint = path.rsplit('/').next().unwrap_or(path);
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "requesting {endpoint}");

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::Fetch { endpoint, status });
        }

        let body = res.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::DataFormat(format!(
                "{endpoint} body is not the expected JSON ({e}): {}",
                truncate_body(&body)
            ))
        })
    }
}

#[async_trait]
impl WeatherProvider for DataGovProvider {
    async fn fetch_forecast(&self) -> Result<Envelope, WeatherError> {
        self.fetch_envelope(FORECAST_PATH).await
    }

    async fn fetch_temperature(&self) -> Result<Envelope, WeatherError> {
        self.fetch_envelope(TEMPERATURE_PATH).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
