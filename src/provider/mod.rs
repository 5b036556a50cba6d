mod file;
mod http;

pub use file::FileProvider;
pub use http::HttpProvider;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ParseError, ViewError};

/// Aggregate counters of the crosspost network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosspostStats {
    #[serde(default)]
    pub subreddit_count: u64,
    #[serde(default)]
    pub crosspost_count: u64,
    #[serde(default)]
    pub connection_count: u64,
    #[serde(default)]
    pub user_count: u64,
}

/// One row of a top-subreddits table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSubreddit {
    pub name: String,
    pub count: u64,
}

/// Most frequent crosspost sources and destinations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopSubreddits {
    #[serde(default)]
    pub sources: Vec<RankedSubreddit>,
    #[serde(default)]
    pub destinations: Vec<RankedSubreddit>,
}

impl TopSubreddits {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.destinations.is_empty()
    }
}

/// JSON envelope the analytics API wraps the graph document in
#[derive(Deserialize)]
struct GraphmlEnvelope {
    graphml: Option<String>,
}

/// Source of pre-computed analytics artefacts
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch the raw GraphML text of the crosspost network
    async fn fetch_graphml(&self) -> Result<String, ViewError>;

    /// Fetch the aggregate counters panel
    async fn fetch_stats(&self) -> Result<CrosspostStats, ViewError>;

    /// Fetch the top sources/destinations panel
    async fn fetch_top(&self) -> Result<TopSubreddits, ViewError>;

    /// Human-readable origin, for messages
    fn describe(&self) -> String;
}

/// Pick the provider the configuration points at: a local data directory
/// when one is set, the HTTP API otherwise.
pub fn from_config(config: &Config) -> Box<dyn DataProvider> {
    match &config.data_dir {
        Some(dir) => {
            tracing::info!("Reading analytics from {}", dir.display());
            Box::new(FileProvider::new(dir))
        }
        None => {
            tracing::info!("Fetching analytics from {}", config.api_url);
            Box::new(HttpProvider::new(&config.api_url))
        }
    }
}

fn decode<T: DeserializeOwned>(origin: &str, body: &str) -> Result<T, ParseError> {
    serde_json::from_str(body).map_err(|source| ParseError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Unwrap `{"graphml": "..."}`; a missing or blank payload is an error.
fn unwrap_graphml(origin: &str, body: &str) -> Result<String, ParseError> {
    let envelope: GraphmlEnvelope = decode(origin, body)?;
    envelope
        .graphml
        .filter(|g| !g.trim().is_empty())
        .ok_or_else(|| ParseError::MissingPayload {
            origin: origin.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_camel_case_with_defaults() {
        let stats: CrosspostStats =
            decode("test", r#"{"subredditCount": 12, "crosspostCount": 340, "userCount": 5}"#)
                .unwrap();
        assert_eq!(stats.subreddit_count, 12);
        assert_eq!(stats.crosspost_count, 340);
        assert_eq!(stats.connection_count, 0);
        assert_eq!(stats.user_count, 5);
    }

    #[test]
    fn test_top_optional_lists() {
        let top: TopSubreddits =
            decode("test", r#"{"sources": [{"name": "politics", "count": 9}]}"#).unwrap();
        assert_eq!(top.sources[0].name, "politics");
        assert!(top.destinations.is_empty());
        assert!(!top.is_empty());
    }

    #[test]
    fn test_unwrap_graphml() {
        let body = r#"{"graphml": "<graphml><graph/></graphml>"}"#;
        assert_eq!(unwrap_graphml("api", body).unwrap(), "<graphml><graph/></graphml>");
    }

    #[test]
    fn test_unwrap_graphml_missing_payload() {
        assert!(matches!(
            unwrap_graphml("api", r#"{"graphml": ""}"#),
            Err(ParseError::MissingPayload { .. })
        ));
        assert!(matches!(
            unwrap_graphml("api", r#"{"other": 1}"#),
            Err(ParseError::MissingPayload { .. })
        ));
        assert!(matches!(
            unwrap_graphml("api", "<html>502</html>"),
            Err(ParseError::Json { .. })
        ));
    }
}
