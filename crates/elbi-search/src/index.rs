//! Page index sources: a local `index.json` or one served over HTTP.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use elbi_core::error::{Error, Result};
use elbi_core::traits::IndexSource;
use elbi_core::types::PageRecord;

/// Path the site generator publishes the index under.
pub const INDEX_PATH: &str = "/index.json";

pub fn parse_index(bytes: &[u8]) -> Result<Vec<PageRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads the index once. Failures are not retried.
pub async fn load_index(source: &dyn IndexSource) -> Result<Vec<PageRecord>> {
    debug!(origin = %source.origin(), "loading page index");
    let pages = source.load().await?;
    info!(origin = %source.origin(), pages = pages.len(), "page index loaded");
    Ok(pages)
}

pub struct FileIndexSource {
    path: PathBuf,
}

impl FileIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IndexSource for FileIndexSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<PageRecord>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| Error::IndexFetch {
            origin: self.origin(),
            message: e.to_string(),
        })?;
        parse_index(&bytes)
    }
}

pub struct HttpIndexSource {
    client: reqwest::Client,
    url: String,
}

impl HttpIndexSource {
    /// Fetches `{base_url}/index.json`.
    pub fn for_site(base_url: &str) -> Self {
        Self::new(format!("{}{INDEX_PATH}", base_url.trim_end_matches('/')))
    }

    pub fn new(url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    fn origin(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<Vec<PageRecord>> {
        let fetch_error = |e: reqwest::Error| Error::IndexFetch {
            origin: self.url.clone(),
            message: e.to_string(),
        };
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?;
        let bytes = response.bytes().await.map_err(fetch_error)?;
        parse_index(&bytes)
    }
}
