use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::domain::models::{LookupKey, OpenWeatherResponse, Weather, WeatherConfig};
use crate::domain::ports::{ProviderError, UpstreamProvider};

/// HTTP client for the OpenWeather current-weather API.
///
/// The returned record's city name is folded to canonical notation,
/// matching the normalized lookup key.
pub struct OpenWeatherClient {
    http: ReqwestClient,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        })
    }
}

#[async_trait]
impl UpstreamProvider<Weather> for OpenWeatherClient {
    async fn fetch(&self, key: &LookupKey) -> Result<Weather, ProviderError> {
        debug!(%key, "querying OpenWeather");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", key.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                ProviderError::Transport(
                    anyhow::Error::new(err).context("OpenWeather request failed"),
                )
            })?;

        let envelope: OpenWeatherResponse = response.json().await.map_err(|err| {
            ProviderError::Transport(
                anyhow::Error::new(err).context("undecodable OpenWeather response"),
            )
        })?;

        if envelope.is_no_result() {
            return Err(ProviderError::NoResult);
        }

        let mut weather = envelope.weather;
        weather.name = LookupKey::normalize(&weather.name).into_string();
        Ok(weather)
    }
}
