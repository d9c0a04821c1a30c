use crate::{Error, ManifestEntry, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// HTTP client for fetching the manifest and individual documents.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with configured HTTP client
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docpane/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches the startup manifest: a JSON array of document descriptors.
    pub async fn fetch_manifest(&self, url: &str) -> Result<Vec<ManifestEntry>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Load(format!(
                "Manifest request to '{url}' failed with status {status}"
            )));
        }

        let entries: Vec<ManifestEntry> = response.json().await.map_err(|e| {
            Error::Serialization(format!("Manifest at '{url}' is not a descriptor array: {e}"))
        })?;

        info!("Fetched manifest with {} entries from {}", entries.len(), url);
        Ok(entries)
    }

    /// Fetches raw document text, returning content and its `SHA256` hash.
    ///
    /// Any non-2xx response fails the fetch; 404 maps to [`Error::NotFound`]
    /// so callers can tell a missing document from a broken server.
    pub async fn fetch_text(&self, url: &str) -> Result<(String, String)> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "Document not found at '{url}'. Check the manifest path"
                )));
            }

            match response.error_for_status() {
                Ok(_) => unreachable!("Status should be an error"),
                Err(err) => return Err(Error::Network(err)),
            }
        }

        let content = response.text().await?;
        let sha256 = calculate_sha256(&content);

        debug!("Fetched {} bytes from {}", content.len(), url);

        Ok((content, sha256))
    }

    /// Resolves a manifest entry's path against the manifest URL.
    ///
    /// Absolute paths pass through untouched; relative paths join against
    /// the manifest's base.
    pub fn resolve_path(manifest_url: &str, path: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute.to_string());
        }

        let base = Url::parse(manifest_url)
            .map_err(|e| Error::InvalidUrl(format!("Bad manifest URL '{manifest_url}': {e}")))?;
        let resolved = base
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("Cannot resolve '{path}': {e}")))?;
        Ok(resolved.to_string())
    }
}

fn calculate_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    STANDARD.encode(result)
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.
