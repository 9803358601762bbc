//! Guidecom catalog search
//!
//! Searches the Guidecom catalog for a keyword, optionally restricted to a set of
//! manufacturer facets, and returns a deduplicated, price-ranked product list.
//! The interactive front-end lives elsewhere; it talks to [`CatalogService`].

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-export the collaborator surface for easier access
pub use application::CatalogService;
pub use domain::{
    CatalogResult, CurationBucket, CurationPlan, FetchError, PageFetcher, Product, SearchError,
    SearchFacet, SearchQuery, SearchRequest, SortOrder,
};
pub use infrastructure::{HttpClient, SearchConfig};
pub use tokio_util::sync::CancellationToken;
