use std::future::Future;
use std::path::PathBuf;

use crate::error::AppError;

/// Source of the raw dashboard resources, addressed by file name.
pub trait ResourceFetcher: Sync {
    fn fetch(&self, resource: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Reads resources from a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryFetcher { root: root.into() }
    }
}

impl ResourceFetcher for DirectoryFetcher {
    async fn fetch(&self, resource: &str) -> Result<String, AppError> {
        let path = self.root.join(resource);
        log::debug!("Reading {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// GETs resources under a base URL. Non-2xx statuses are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build()?;
        Ok(HttpFetcher {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), resource)
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, resource: &str) -> Result<String, AppError> {
        let url = self.url_for(resource);
        log::debug!("GET {}", url);
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_fetcher_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kpis_calculados.json"), "{}").unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("kpis_calculados.json").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_directory_fetcher_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        match fetcher.fetch("absent.json").await {
            Err(AppError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_http_url_join() {
        let f = HttpFetcher::new("http://localhost:5173/src/data/").unwrap();
        assert_eq!(
            f.url_for("mais_cotados.json"),
            "http://localhost:5173/src/data/mais_cotados.json"
        );
    }
}
