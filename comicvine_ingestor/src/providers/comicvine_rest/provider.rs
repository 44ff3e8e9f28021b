use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shared_utils::env::get_env_var;

use crate::{
    models::{
        issue::IssueRecord,
        query::{IssuesQuery, VolumesQuery},
        volume::VolumeRecord,
    },
    providers::{
        MetadataProvider, ProviderError, ProviderInitError,
        comicvine_rest::{params, response::Envelope},
    },
};

const BASE_URL: &str = "https://comicvine.gamespot.com/api";
// ComicVine rejects requests without a User-Agent.
const USER_AGENT: &str = "issue-sync/0.2";

pub struct ComicVineProvider {
    client: Client,
    api_key: SecretString,
    limiter: DefaultDirectRateLimiter,
    timeout: Duration,
}

impl ComicVineProvider {
    /// Creates a new ComicVine provider.
    ///
    /// Reads the API key from the `COMICVINE_API_KEY` environment variable.
    /// `timeout` bounds each call end to end, rate-limiter wait included, so
    /// callers running under a wall-clock budget get a hard per-call ceiling.
    pub fn new(timeout: Duration) -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var("COMICVINE_API_KEY")?.into());

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        // ComicVine enforces 200 requests per resource per hour. Pacing all
        // traffic under that ceiling keeps long priming passes from tripping
        // the limit and poisoning the cache with failure records.
        let limiter = RateLimiter::direct(Quota::per_hour(nonzero!(200u32)));

        Ok(Self {
            client,
            api_key,
            limiter,
            timeout,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ProviderError> {
        let url = format!("{BASE_URL}/{path}");

        let request = async {
            self.limiter.until_ready().await;

            let response = self.client.get(&url).query(&query).send().await?;

            if !response.status().is_success() {
                let status = response.status().as_u16() as i32;
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown API error".to_string());
                return Err(ProviderError::Service { status, message });
            }

            let envelope = response.json::<Envelope>().await?;
            envelope.into_results()
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ProviderError::Timeout)?
    }
}

#[async_trait]
impl MetadataProvider for ComicVineProvider {
    async fn get_volume(&self, volume_id: i64) -> Result<VolumeRecord, ProviderError> {
        let query = params::volume_params(self.api_key.expose_secret());
        // 4050 is ComicVine's resource-type prefix for volumes.
        self.get_json(&format!("volume/4050-{volume_id}/"), query)
            .await
    }

    async fn list_issues(&self, query: &IssuesQuery) -> Result<Vec<IssueRecord>, ProviderError> {
        let params = params::issues_params(self.api_key.expose_secret(), query);
        self.get_json("issues/", params).await
    }

    async fn list_volumes(&self, query: &VolumesQuery) -> Result<Vec<VolumeRecord>, ProviderError> {
        let params = params::volumes_params(self.api_key.expose_secret(), query);
        let mut volumes: Vec<VolumeRecord> = self.get_json("volumes/", params).await?;

        // The search endpoint only filters by name; narrow by publisher and
        // year client-side.
        if let Some(publisher) = &query.publisher {
            volumes.retain(|v| {
                v.publisher.as_ref().and_then(|p| p.name.as_deref()) == Some(publisher.as_str())
            });
        }
        if let Some(year) = query.year {
            volumes.retain(|v| v.start_year == Some(year));
        }

        Ok(volumes)
    }
}
