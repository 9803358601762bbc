//! Domain module - catalog entities and the ports the search core depends on
//!
//! - `product`: raw listings and normalized products
//! - `brand`: brand extraction and matching on product titles
//! - `search`: sort orders, facets, queries and request descriptors
//! - `errors`: caller-facing error taxonomy
//! - `parsing_error`: structural failures reading a result page
//! - `page_fetcher`: the transport port

pub mod brand;
pub mod errors;
pub mod page_fetcher;
pub mod parsing_error;
pub mod product;
pub mod search;

// Re-export commonly used items for convenience
pub use errors::{CatalogResult, FetchError, SearchError};
pub use page_fetcher::PageFetcher;
pub use parsing_error::{ParsingError, ParsingResult};
pub use product::{Product, RawListing};
pub use search::{CurationBucket, CurationPlan, SearchFacet, SearchQuery, SearchRequest, SortOrder};
