use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::LoadedDirectory, error::FetchError, filter::derive_countries,
    protocol::decode_user_page,
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod session;

pub use config::{load_settings, Settings};
pub use session::{run_load, DirectorySession, SessionPhase};

pub const DEFAULT_API_URL: &str = "https://randomuser.me/api/";
/// Fixed batch size requested from the upstream API.
pub const DEFAULT_RESULT_COUNT: u32 = 50;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the session gets its users and portraits from.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn load(&self) -> Result<LoadedDirectory, FetchError>;
    async fn fetch_portrait(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    api_url: Url,
    result_count: u32,
}

impl DirectoryClient {
    pub fn new(api_url: &str, request_timeout: Duration) -> Result<Self> {
        let api_url =
            Url::parse(api_url).with_context(|| format!("invalid api url '{api_url}'"))?;
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            api_url,
            result_count: DEFAULT_RESULT_COUNT,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.api_url, settings.request_timeout())
    }

    /// The endpoint plus `results=<count>`; any other query on the
    /// configured URL is dropped.
    pub fn request_url(&self) -> Url {
        let mut url = self.api_url.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("results", &self.result_count.to_string());
        url
    }

    pub async fn load(&self) -> Result<LoadedDirectory, FetchError> {
        let url = self.request_url();
        info!(%url, "fetching user batch");
        let body = self.get_bytes(url).await?;
        let users = decode_user_page(&body)?;
        let countries = derive_countries(&users);
        info!(
            users = users.len(),
            countries = countries.len(),
            "user batch loaded"
        );
        Ok(LoadedDirectory { users, countries })
    }

    pub async fn fetch_portrait(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::Decode("record has no portrait url".to_string()));
        }
        let url = Url::parse(url).map_err(|err| FetchError::Decode(err.to_string()))?;
        debug!(%url, "fetching portrait");
        self.get_bytes(url).await
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| {
                warn!(%url, "request failed: {err}");
                FetchError::Transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "upstream returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl UserSource for DirectoryClient {
    async fn load(&self) -> Result<LoadedDirectory, FetchError> {
        DirectoryClient::load(self).await
    }

    async fn fetch_portrait(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        DirectoryClient::fetch_portrait(self, url).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
