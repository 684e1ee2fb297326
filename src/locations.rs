//! Resource location resolution
//!
//! This module classifies schema sources (URLs, file paths, inline text)
//! and checks that a caller-supplied URL can be fetched.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Resource location - can be a URL, file path, or inline document
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// Remote http(s) URL
    Url(Url),
    /// Inline XML text
    String(String),
}

impl Location {
    /// Parse a remote schema URL
    ///
    /// Only `http` and `https` are fetchable.
    pub fn remote(s: &str) -> Result<Url> {
        let url = Url::parse(s.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Fetch(format!(
                "Unsupported URL scheme '{}' in '{}'",
                other, url
            ))),
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    /// Auto-detect the location type
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("A schema location is required.".to_string()));
        }

        if trimmed.starts_with('<') {
            return Ok(Location::String(s.to_string()));
        }

        if let Ok(url) = Url::parse(trimmed) {
            match url.scheme() {
                "http" | "https" => return Ok(Location::Url(url)),
                "file" => {
                    let path = url
                        .to_file_path()
                        .map_err(|_| Error::Fetch(format!("Invalid file URL: {}", url)))?;
                    return Ok(Location::Path(path));
                }
                // Windows drive letters parse as one-letter schemes
                _ => {}
            }
        }

        Ok(Location::Path(PathBuf::from(trimmed)))
    }
}
