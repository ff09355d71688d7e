//! Error types for nxsweep-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nxsweep-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for nxsweep-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    /// A listing page could not be fetched or parsed
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A single component could not be deleted
    #[error("Failed to delete component {id} ({url}): {reason}")]
    Delete {
        id: String,
        url: String,
        reason: String,
    },

    /// Path filter is not a valid regular expression
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The remote kept returning continuation tokens past the configured ceiling
    #[error("Page limit exceeded: still more pages after {0} requests")]
    PageLimitExceeded(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl Error {
    /// Build a fetch error for `url` from any displayable cause
    pub fn fetch(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a delete error for component `id` from any displayable cause
    pub fn delete(id: impl Into<String>, url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Delete {
            id: id.into(),
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Describe a reqwest failure the way the transport reports it
pub(crate) fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Operation timed out".to_string()
    } else if err.is_connect() {
        format!("Network error: {}", err)
    } else if err.is_decode() {
        format!("Invalid response body: {}", err)
    } else {
        format!("HTTP client error: {}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_url() {
        let err = Error::fetch("http://nexus/page", "boom");
        assert_eq!(err.to_string(), "Failed to fetch http://nexus/page: boom");
    }

    #[test]
    fn test_delete_error_names_id() {
        let err = Error::delete("abc", "http://nexus/c/abc", "HTTP 500");
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("HTTP 500"));
    }
}
