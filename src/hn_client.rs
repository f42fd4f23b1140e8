use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, StoriesError};
use crate::models::{ItemId, ItemRecord};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

/// Remote side of the service: the ranking list and single item lookups.
///
/// Neither call caches anything; that is left to [`crate::fetcher::ItemFetcher`].
#[async_trait]
pub trait HackerNewsApi: Send + Sync {
    /// Current best stories, most-best first. May be empty.
    async fn best_story_ids(&self) -> Result<Vec<ItemId>>;

    /// `Ok(None)` when the remote has no record for `id`.
    async fn fetch_item(&self, id: ItemId) -> Result<Option<ItemRecord>>;
}

pub struct HackerNewsClient {
    client: Client,
    base_url: String,
}

impl HackerNewsClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // GET `{base}/{path}`, treating an empty or `null` body as no value
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoriesError::transport(
                Some(status.as_u16()),
                format!("GET {url} returned {status}"),
            ));
        }

        let body = response.text().await?;
        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Option<T>>(body).map_err(|e| {
            StoriesError::transport(None, format!("Malformed payload from {url}: {e}"))
        })
    }
}

#[async_trait]
impl HackerNewsApi for HackerNewsClient {
    async fn best_story_ids(&self) -> Result<Vec<ItemId>> {
        let ids = self.get_json::<Vec<ItemId>>("beststories.json").await?;
        Ok(ids.unwrap_or_default())
    }

    async fn fetch_item(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        self.get_json(&format!("item/{id}.json")).await
    }
}
