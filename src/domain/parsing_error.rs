//! Parsing error types for result-page markup
//!
//! Only structural failures are errors here. A listing with missing fields is
//! normal input and is handled during normalization.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Product list container not found (tried: {})", .tried_selectors.join(", "))]
    ContainerNotFound { tried_selectors: Vec<String> },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ParsingError {
    /// Create a container-not-found error with the selectors that were tried
    pub const fn container_not_found(tried_selectors: Vec<String>) -> Self {
        Self::ContainerNotFound { tried_selectors }
    }

    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
