//! Result-page markup parsing
//!
//! The catalog's markup is a moving target, so everything that knows about it sits
//! behind [`MarkupExtractor`]. A layout change means a new extractor (or new
//! selectors in [`ParsingConfig`]); paging, dedup and ranking never look at markup.

pub mod config;
pub mod guidecom_markup;
pub mod product_list_parser;

// Re-export public types
pub use config::{FacetSelectors, ParsingConfig, ProductListSelectors};
pub use guidecom_markup::GuidecomMarkup;
pub use product_list_parser::ProductListParser;

use crate::domain::{RawListing, SearchFacet};
use crate::domain::parsing_error::ParsingResult;

/// Locate-and-extract capability over one result page
pub trait MarkupExtractor: Send + Sync {
    /// Entries of the page in document order, fields as found.
    ///
    /// Fails only when the product list container cannot be located at all.
    fn extract_listings(&self, markup: &str) -> ParsingResult<Vec<RawListing>>;

    /// Brand facets advertised by the page, in document order.
    ///
    /// A page without a recognizable filter section yields an empty Vec.
    fn extract_facets(&self, markup: &str) -> Vec<SearchFacet>;
}
