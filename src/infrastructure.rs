//! Infrastructure layer for configuration, transport, markup parsing and logging
//!
//! Everything that knows about the Guidecom site itself (URLs, parameter names,
//! selectors, HTTP behaviour) lives here; the application layer only sees the
//! domain ports.

pub mod config;  // Configuration loading, defaults and site constants
pub mod http_client;  // reqwest-backed PageFetcher
pub mod logging;  // Logging infrastructure
pub mod parsing;  // Markup extraction behind the MarkupExtractor trait
pub mod query_builder;  // SearchQuery -> SearchRequest

// Re-export commonly used items
pub use config::{ConfigError, LoggingConfig, SearchConfig, guidecom};
pub use http_client::HttpClient;
pub use parsing::{GuidecomMarkup, MarkupExtractor, ParsingConfig, ProductListParser};
pub use crate::domain::parsing_error::{ParsingError, ParsingResult};
pub use query_builder::QueryBuilder;
