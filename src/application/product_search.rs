//! Paged product search
//!
//! One strictly sequential page loop per call. Between two fetches the loop waits the
//! configured delay on the calling task.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::brand::matches_any_brand;
use crate::domain::{CatalogResult, PageFetcher, Product, SearchError, SearchQuery, SortOrder};
use crate::infrastructure::{ProductListParser, QueryBuilder, SearchConfig};

/// Paging limits taken from [`SearchConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingSettings {
    pub page_delay: Duration,
    pub over_fetch_multiple: usize,
    pub max_pages: u32,
    pub empty_page_limit: u32,
}

impl From<&SearchConfig> for PagingSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            page_delay: config.page_delay(),
            over_fetch_multiple: config.over_fetch_multiple.max(1),
            max_pages: config.max_pages,
            empty_page_limit: config.empty_page_limit.max(1),
        }
    }
}

pub struct ProductSearch {
    fetcher: Arc<dyn PageFetcher>,
    query_builder: QueryBuilder,
    parser: ProductListParser,
    settings: PagingSettings,
}

impl ProductSearch {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        query_builder: QueryBuilder,
        parser: ProductListParser,
        settings: PagingSettings,
    ) -> Self {
        Self {
            fetcher,
            query_builder,
            parser,
            settings,
        }
    }

    /// Collect raw products for a keyword, page by page.
    ///
    /// Stops once `target_count × over_fetch_multiple` records are collected, after
    /// `empty_page_limit` consecutive empty pages, at the page ceiling, or when
    /// `cancel` fires. Only a failure on the first page is an error; later failures
    /// end paging with what was collected.
    ///
    /// Brand facet codes are sent to the catalog and also checked against each
    /// product title, since the catalog does not always honour them.
    pub async fn search(
        &self,
        keyword: &str,
        sort: SortOrder,
        facet_codes: &[String],
        target_count: usize,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Product>> {
        if target_count == 0 {
            return Err(SearchError::invalid_input("target count must be greater than 0"));
        }
        let first_query = SearchQuery::new(keyword, sort, facet_codes, 1)?;
        let wanted = target_count.saturating_mul(self.settings.over_fetch_multiple);

        // Numeric codes are the catalog's own maker ids and cannot be checked against titles
        let brand_codes = first_query.facet_codes();
        let check_brands = !brand_codes.is_empty()
            && !brand_codes.iter().any(|code| code.chars().all(|c| c.is_ascii_digit()));

        let mut records: Vec<Product> = Vec::new();
        let mut empty_streak = 0u32;
        let mut pages_fetched = 0u32;

        for page in 1..=self.settings.max_pages {
            if cancel.is_cancelled() {
                info!("Search for '{}' cancelled before page {}", first_query.keyword(), page);
                break;
            }
            if page > 1 && !self.pause(cancel).await {
                info!("Search for '{}' cancelled while waiting for page {}", first_query.keyword(), page);
                break;
            }

            let query = first_query.at_page(page)?;
            let request = self.query_builder.build(&query);
            pages_fetched += 1;

            let markup = match self.fetcher.fetch(&request).await {
                Ok(markup) => markup,
                Err(source) if page == 1 => {
                    return Err(SearchError::UpstreamUnavailable {
                        url: request.to_url().to_string(),
                        source,
                    });
                }
                Err(e) => {
                    warn!("Page {} fetch failed, treating as end of results: {}", page, e);
                    break;
                }
            };

            let products = match self.parser.parse(&markup) {
                Ok(products) => products,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    warn!("Page {} not parseable, treating as end of results: {}", page, e);
                    break;
                }
            };

            if products.is_empty() {
                empty_streak += 1;
                debug!("Page {} empty ({} in a row)", page, empty_streak);
                if empty_streak >= self.settings.empty_page_limit {
                    break;
                }
            } else {
                empty_streak = 0;
                let found = products.len();
                let kept: Vec<Product> = if check_brands {
                    products
                        .into_iter()
                        .filter(|product| matches_any_brand(&product.name, brand_codes))
                        .collect()
                } else {
                    products
                };
                debug!("Page {} yielded {} products, {} kept", page, found, kept.len());
                records.extend(kept);
            }

            if records.len() >= wanted {
                debug!("Collected {} records (wanted {})", records.len(), wanted);
                break;
            }
        }

        info!(
            "Search '{}' ({}) collected {} records from {} pages",
            first_query.keyword(),
            sort,
            records.len(),
            pages_fetched
        );
        Ok(records)
    }

    /// Wait the inter-page delay; false when cancelled meanwhile
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            () = tokio::time::sleep(self.settings.page_delay) => true,
            () = cancel.cancelled() => false,
        }
    }
}
