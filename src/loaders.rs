//! Resource loading utilities
//!
//! This module retrieves schema text from remote URLs, local files, or
//! inline strings. Remote fetches use a shared `reqwest` client with a
//! bounded timeout; every body is checked against the size limit.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for a single schema fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the schema loader
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout covering connect, request and body download
    pub timeout: Duration,
    /// Resource limits
    pub limits: Limits,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            limits: Limits::default(),
        }
    }
}

impl FetchConfig {
    /// Set the fetch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// Resource loader for schemas
#[derive(Debug, Clone)]
pub struct Loader {
    client: Client,
    limits: Limits,
}

impl Loader {
    /// Create a loader from the given settings
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("xsd-docs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            limits: config.limits.clone(),
        })
    }

    /// Limits applied to fetched and parsed documents
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Fetch the body of a remote http(s) URL as text
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let url = Location::remote(url)?;

        tracing::debug!(%url, "fetching schema");
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to fetch '{}': {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "Response status code does not indicate success: {} for '{}'",
                status, url
            )));
        }

        if let Some(length) = response.content_length() {
            self.limits
                .check_xml_size(usize::try_from(length).unwrap_or(usize::MAX))?;
        }

        // Chunked and length-less bodies are bounded while they stream in
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read response from '{}': {}", url, e)))?
        {
            self.limits.check_xml_size(body.len() + chunk.len())?;
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Load a resource as a string
    pub async fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::Path(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    Error::Fetch(format!("Failed to read file '{}': {}", path.display(), e))
                })?;

                // Check size limits
                self.limits.check_xml_size(content.len())?;

                Ok(content)
            }
            Location::Url(url) => self.fetch(url.as_str()).await,
            Location::String(s) => {
                self.limits.check_xml_size(s.len())?;
                Ok(s.clone())
            }
        }
    }
}
