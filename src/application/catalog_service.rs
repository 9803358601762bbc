//! Catalog search facade
//!
//! Wires facet discovery, paged search, dedup and ranking over one shared fetcher and
//! markup extractor. This is the surface other components call.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::dedup::{Deduplicator, dedupe};
use super::facet_discovery::FacetDiscovery;
use super::product_search::{PagingSettings, ProductSearch};
use super::ranking::rank;
use crate::domain::search::normalize_keyword;
use crate::domain::{
    CatalogResult, CurationPlan, PageFetcher, Product, SearchError, SearchFacet, SortOrder,
};
use crate::infrastructure::{
    ConfigError, GuidecomMarkup, HttpClient, MarkupExtractor, ProductListParser, QueryBuilder,
    SearchConfig,
};

pub struct CatalogService {
    facets: FacetDiscovery,
    search: ProductSearch,
    curation: CurationPlan,
}

impl CatalogService {
    /// Build the service over any fetcher; selectors and paging come from `config`
    pub fn new(config: &SearchConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self, ConfigError> {
        config.validate()?;

        let query_builder = QueryBuilder::from_config(config)?;
        let extractor: Arc<dyn MarkupExtractor> = Arc::new(GuidecomMarkup::with_config(&config.parsing)?);

        let facets = FacetDiscovery::new(Arc::clone(&fetcher), query_builder.clone(), Arc::clone(&extractor));
        let search = ProductSearch::new(
            fetcher,
            query_builder,
            ProductListParser::with_extractor(extractor),
            PagingSettings::from(config),
        );

        Ok(Self {
            facets,
            search,
            curation: config.curation.clone(),
        })
    }

    /// Service talking to the live catalog through [`HttpClient`]
    pub fn with_http_client(config: &SearchConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(config)?;
        Ok(Self::new(config, Arc::new(client))?)
    }

    /// Brand filters available for `keyword`
    pub async fn list_facets(&self, keyword: &str) -> CatalogResult<Vec<SearchFacet>> {
        self.facets.discover(keyword).await
    }

    /// Up to `limit` distinct products, cheapest first
    pub async fn search_unique(
        &self,
        keyword: &str,
        sort: SortOrder,
        facet_codes: &[String],
        limit: usize,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Product>> {
        if limit == 0 {
            return Err(SearchError::invalid_input("limit must be greater than 0"));
        }
        normalize_keyword(keyword)?;

        let records = self.search.search(keyword, sort, facet_codes, limit, cancel).await?;
        let raw_count = records.len();
        let unique = dedupe(records);
        let ranked = rank(unique, limit)?;

        info!(
            "search_unique '{}' ({}): {} raw, {} returned",
            keyword.trim(),
            sort,
            raw_count,
            ranked.len()
        );
        Ok(ranked)
    }

    /// A mix of cheapest, popular and promoted products, per the configured plan.
    ///
    /// Products already picked by an earlier bucket are skipped. A failing bucket is
    /// logged and skipped; the first failure is returned only when no bucket succeeds.
    pub async fn search_curated(
        &self,
        keyword: &str,
        facet_codes: &[String],
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Product>> {
        normalize_keyword(keyword)?;
        let total = self.curation.total();
        if total == 0 {
            return Err(SearchError::invalid_input("curation plan selects no products"));
        }

        let mut seen = Deduplicator::new();
        let mut picked: Vec<Product> = Vec::with_capacity(total);
        let mut first_error: Option<SearchError> = None;
        let mut succeeded = 0usize;

        for bucket in self.curation.buckets.iter().filter(|bucket| bucket.take > 0) {
            if cancel.is_cancelled() {
                break;
            }
            match self.search.search(keyword, bucket.sort, facet_codes, bucket.take, cancel).await {
                Ok(records) => {
                    succeeded += 1;
                    let before = picked.len();
                    picked.extend(
                        records
                            .into_iter()
                            .filter(|product| seen.insert(product))
                            .take(bucket.take),
                    );
                    info!("Curated bucket {} picked {} products", bucket.sort, picked.len() - before);
                }
                Err(e @ SearchError::InvalidInput(_)) => return Err(e),
                Err(e) => {
                    warn!("Curated bucket {} skipped: {}", bucket.sort, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if succeeded == 0 {
            if let Some(error) = first_error {
                return Err(error);
            }
        }

        rank(picked, total)
    }
}
