use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{CrosspostStats, DataProvider, TopSubreddits, decode, unwrap_graphml};
use crate::error::{FetchError, ViewError};

pub const GRAPHML_FILE: &str = "crosspost-network.graphml";
/// API response dump, used when the raw GraphML file is absent
pub const GRAPHML_ENVELOPE_FILE: &str = "crosspost-network.json";
pub const STATS_FILE: &str = "crosspost-stats.json";
pub const TOP_FILE: &str = "crosspost-top.json";

/// Reads analytics artefacts from a local directory
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    async fn read(&self, name: &str) -> Result<(String, String), FetchError> {
        let path = self.dir.join(name);
        let origin = path.display().to_string();
        tracing::debug!("Reading {}", origin);

        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: origin.clone(),
                source,
            })?;
        Ok((origin, body))
    }
}

#[async_trait]
impl DataProvider for FileProvider {
    async fn fetch_graphml(&self) -> Result<String, ViewError> {
        let raw = self.dir.join(GRAPHML_FILE);
        let envelope = self.dir.join(GRAPHML_ENVELOPE_FILE);

        if !raw.exists() && envelope.exists() {
            let (origin, body) = self.read(GRAPHML_ENVELOPE_FILE).await?;
            return Ok(unwrap_graphml(&origin, &body)?);
        }

        let (_, body) = self.read(GRAPHML_FILE).await?;
        Ok(body)
    }

    async fn fetch_stats(&self) -> Result<CrosspostStats, ViewError> {
        let (origin, body) = self.read(STATS_FILE).await?;
        Ok(decode(&origin, &body)?)
    }

    async fn fetch_top(&self) -> Result<TopSubreddits, ViewError> {
        let (origin, body) = self.read(TOP_FILE).await?;
        Ok(decode(&origin, &body)?)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_all_artefacts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(GRAPHML_FILE), "<graphml><graph/></graphml>").unwrap();
        fs::write(
            dir.path().join(STATS_FILE),
            r#"{"subredditCount": 3, "crosspostCount": 7, "connectionCount": 9, "userCount": 2}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(TOP_FILE),
            r#"{"sources": [], "destinations": [{"name": "news", "count": 4}]}"#,
        )
        .unwrap();

        let provider = FileProvider::new(dir.path());
        assert_eq!(
            provider.fetch_graphml().await.unwrap(),
            "<graphml><graph/></graphml>"
        );
        assert_eq!(provider.fetch_stats().await.unwrap().connection_count, 9);
        assert_eq!(provider.fetch_top().await.unwrap().destinations[0].count, 4);
    }

    #[tokio::test]
    async fn test_envelope_fallback() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(GRAPHML_ENVELOPE_FILE),
            r#"{"graphml": "<graphml/>"}"#,
        )
        .unwrap();
        let provider = FileProvider::new(dir.path());
        assert_eq!(provider.fetch_graphml().await.unwrap(), "<graphml/>");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let provider = FileProvider::new(dir.path());
        let err = provider.fetch_stats().await.unwrap_err();
        assert!(matches!(err, ViewError::Fetch(FetchError::Io { .. })));
        assert!(err.to_string().contains(STATS_FILE));
    }

    #[tokio::test]
    async fn test_bad_json_is_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(TOP_FILE), "{ nope").unwrap();
        let provider = FileProvider::new(dir.path());
        let err = provider.fetch_top().await.unwrap_err();
        assert!(matches!(err, ViewError::Parse(ParseError::Json { .. })));
    }
}
