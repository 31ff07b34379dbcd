use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::domain::models::{LookupKey, Movie, OmdbConfig, OmdbResponse};
use crate::domain::ports::{ProviderError, UpstreamProvider};

/// HTTP client for the OMDb movie API.
///
/// One outbound request per fetch, bounded by the client-level timeout.
/// The returned movie's title is folded to canonical notation so cache
/// and store keys derived from it match the normalized lookup key.
pub struct OmdbClient {
    http: ReqwestClient,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build OMDb HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl UpstreamProvider<Movie> for OmdbClient {
    async fn fetch(&self, key: &LookupKey) -> Result<Movie, ProviderError> {
        debug!(%key, "querying OMDb");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", key.as_str()),
                ("plot", "full"),
            ])
            .send()
            .await
            .map_err(|err| {
                ProviderError::Transport(anyhow::Error::new(err).context("OMDb request failed"))
            })?;

        let envelope: OmdbResponse = response.json().await.map_err(|err| {
            ProviderError::Transport(anyhow::Error::new(err).context("undecodable OMDb response"))
        })?;

        if envelope.is_no_result() {
            return Err(ProviderError::NoResult);
        }

        let mut movie = envelope.movie;
        movie.title = LookupKey::normalize(&movie.title).into_string();
        Ok(movie)
    }
}
