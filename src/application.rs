//! Application layer module
//!
//! Search use cases orchestrating the domain ports: facet discovery, paged product
//! search, dedup, ranking, and the [`CatalogService`] facade that chains them.

pub mod catalog_service;
pub mod dedup;
pub mod facet_discovery;
pub mod product_search;
pub mod ranking;

// Re-export commonly used items
pub use catalog_service::CatalogService;
pub use dedup::{Deduplicator, dedupe};
pub use facet_discovery::FacetDiscovery;
pub use product_search::{PagingSettings, ProductSearch};
pub use ranking::rank;
