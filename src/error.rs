//! Error types.
//!
//! Upstream fetch errors never escape a refresh cycle; they are folded into
//! an empty collection plus a failed [`crate::store::SourceStatus`]. Config
//! errors are only fatal at start-up.

use thiserror::Error;

/// Failure while fetching one upstream collection.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{collection}: request failed: {source}")]
    Http {
        collection: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{collection}: upstream responded with status {status}")]
    Status {
        collection: &'static str,
        status: u16,
    },

    #[error("{collection}: invalid JSON payload: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Name of the collection the failed request was for.
    pub fn collection(&self) -> &'static str {
        match self {
            FetchError::Http { collection, .. }
            | FetchError::Status { collection, .. }
            | FetchError::Decode { collection, .. } => collection,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            collection: "orders",
            status: 503,
        };
        assert_eq!(err.collection(), "orders");
        assert_eq!(
            err.to_string(),
            "orders: upstream responded with status 503"
        );
    }

    #[test]
    fn test_decode_error_keeps_collection() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = FetchError::Decode {
            collection: "products",
            source,
        };
        assert_eq!(err.collection(), "products");
        assert!(err.to_string().starts_with("products: invalid JSON payload"));
    }
}
