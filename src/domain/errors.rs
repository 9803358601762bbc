//! Error taxonomy surfaced to callers of the catalog search core

use thiserror::Error;

use super::parsing_error::ParsingError;

/// Failure reported by a [`PageFetcher`](super::PageFetcher) implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP request failed with status {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Response from {url} too short ({length} bytes)")]
    ResponseTooShort { url: String, length: usize },

    #[error("Request cancelled: {url}")]
    Cancelled { url: String },
}

impl FetchError {
    /// Whether another attempt at the same request could succeed
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::ResponseTooShort { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Cancelled { .. } => false,
        }
    }
}

/// Errors returned by the search core
#[derive(Error, Debug)]
pub enum SearchError {
    /// Bad arguments; never retried
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The catalog could not be reached for the first page of a request
    #[error("Catalog unavailable at {url}: {source}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        source: FetchError,
    },

    /// The result page no longer matches the expected layout
    #[error("Result page layout not recognized: {0}")]
    Parse(#[from] ParsingError),
}

impl SearchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Distinguishes "the site changed" from "nothing matched"
    pub const fn is_layout_change(&self) -> bool {
        matches!(self, Self::Parse(ParsingError::ContainerNotFound { .. }))
    }
}

pub type CatalogResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let server = FetchError::Status { status: 503, url: "u".into() };
        let missing = FetchError::Status { status: 404, url: "u".into() };
        let short = FetchError::ResponseTooShort { url: "u".into(), length: 12 };

        assert!(server.is_retryable());
        assert!(!missing.is_retryable());
        assert!(short.is_retryable());
        assert!(!FetchError::Cancelled { url: "u".into() }.is_retryable());
    }

    #[test]
    fn test_layout_change_detection() {
        let err = SearchError::from(ParsingError::container_not_found(vec!["#goods-list".into()]));
        assert!(err.is_layout_change());
        assert!(!SearchError::invalid_input("empty keyword").is_layout_change());
    }
}
