use async_trait::async_trait;
use reqwest::Client;

use super::{CrosspostStats, DataProvider, TopSubreddits, decode, unwrap_graphml};
use crate::error::{FetchError, ViewError};

const GRAPHML_PATH: &str = "/api/crosspost-network-graphml";
const STATS_PATH: &str = "/api/crosspost-stats";
const TOP_PATH: &str = "/api/crosspost-top";

/// Reads analytics over plain HTTP GET. No timeout and no retry: a hung
/// request stays pending.
pub struct HttpProvider {
    client: Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<(String, String), FetchError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;

        Ok((url, body))
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn fetch_graphml(&self) -> Result<String, ViewError> {
        let (url, body) = self.get(GRAPHML_PATH).await?;
        Ok(unwrap_graphml(&url, &body)?)
    }

    async fn fetch_stats(&self) -> Result<CrosspostStats, ViewError> {
        let (url, body) = self.get(STATS_PATH).await?;
        Ok(decode(&url, &body)?)
    }

    async fn fetch_top(&self) -> Result<TopSubreddits, ViewError> {
        let (url, body) = self.get(TOP_PATH).await?;
        Ok(decode(&url, &body)?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
