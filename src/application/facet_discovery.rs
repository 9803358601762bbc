use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::brand::{brand_code, extract_brand};
use crate::domain::{CatalogResult, PageFetcher, SearchError, SearchFacet, SearchQuery, SortOrder};
use crate::infrastructure::{MarkupExtractor, QueryBuilder};

/// Finds which brand filters the catalog offers for a keyword
pub struct FacetDiscovery {
    fetcher: Arc<dyn PageFetcher>,
    query_builder: QueryBuilder,
    extractor: Arc<dyn MarkupExtractor>,
}

impl FacetDiscovery {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        query_builder: QueryBuilder,
        extractor: Arc<dyn MarkupExtractor>,
    ) -> Self {
        Self {
            fetcher,
            query_builder,
            extractor,
        }
    }

    /// One unfiltered fetch; facets in document order, first occurrence of a code kept.
    ///
    /// Without a filter section on the page, facets are derived from the brands of
    /// the listed product titles. A page with neither yields an empty list.
    pub async fn discover(&self, keyword: &str) -> CatalogResult<Vec<SearchFacet>> {
        let query = SearchQuery::new(keyword, SortOrder::Popular, std::iter::empty::<&str>(), 1)?;
        let request = self.query_builder.build(&query);

        let markup = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|source| SearchError::UpstreamUnavailable {
                url: request.to_url().to_string(),
                source,
            })?;

        let mut offered = self.extractor.extract_facets(&markup);
        if offered.is_empty() {
            offered = self.facets_from_titles(&markup);
        }

        let mut seen = HashSet::new();
        let facets: Vec<SearchFacet> = offered
            .into_iter()
            .filter(|facet| {
                let fresh = seen.insert(facet.code.clone());
                if !fresh {
                    debug!("Dropping repeated facet code '{}'", facet.code);
                }
                fresh
            })
            .collect();

        info!("Found {} manufacturer facets for '{}'", facets.len(), query.keyword());
        Ok(facets)
    }

    /// Brand of every named listing, label as written, code normalized
    fn facets_from_titles(&self, markup: &str) -> Vec<SearchFacet> {
        match self.extractor.extract_listings(markup) {
            Ok(listings) => {
                let facets: Vec<SearchFacet> = listings
                    .iter()
                    .filter_map(|listing| listing.name.as_deref())
                    .filter_map(extract_brand)
                    .map(|label| SearchFacet::new(brand_code(&label), label))
                    .collect();
                debug!("Derived {} brand facets from product titles", facets.len());
                facets
            }
            Err(e) => {
                debug!("No listings to derive brand facets from: {}", e);
                Vec::new()
            }
        }
    }
}
