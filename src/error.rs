//! Error types for xsd-docs
//!
//! This module defines all error types used throughout the library.
//! Each variant corresponds to one way a conversion request can fail.

use std::fmt;
use thiserror::Error;

/// Result type alias using xsd-docs Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsd-docs operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid caller input (e.g. a missing source URL)
    #[error("validation error: {0}")]
    Validation(String),

    /// Retrieving the schema failed (network, status, timeout)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The schema text is not well-formed XML
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the
    /// schema source
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// XML parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the document
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
