//! Search request vocabulary: sort orders, facets and query descriptors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::{CatalogResult, SearchError};

/// Result ordering supported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Promoted/sale items first
    #[serde(rename = "event_goods")]
    Event,
    /// Cheapest first
    #[serde(rename = "price_0")]
    PriceAsc,
    /// Recommended/popular first
    #[serde(rename = "reco_goods")]
    Popular,
}

impl SortOrder {
    pub const ALL: [Self; 3] = [Self::Event, Self::PriceAsc, Self::Popular];

    /// Token the catalog expects in the `order` parameter
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Event => "event_goods",
            Self::PriceAsc => "price_0",
            Self::Popular => "reco_goods",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for SortOrder {
    type Err = SearchError;

    /// Accepts wire tokens, the site's own tab labels and legacy aliases
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "event_goods" | "행사상품" | "savedesc" => Ok(Self::Event),
            "price_0" | "낮은가격" | "priceasc" => Ok(Self::PriceAsc),
            "reco_goods" | "인기상품" | "opiniondesc" => Ok(Self::Popular),
            other => Err(SearchError::invalid_input(format!("unknown sort order '{other}'"))),
        }
    }
}

/// One selectable brand filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchFacet {
    pub code: String,
    pub label: String,
}

impl SearchFacet {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Immutable, validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    sort: SortOrder,
    facet_codes: Vec<String>,
    page: u32,
}

impl SearchQuery {
    /// Validate and build a query.
    ///
    /// Facet codes are kept in first-seen order; blanks and repeats are dropped.
    pub fn new<I, S>(keyword: &str, sort: SortOrder, facet_codes: I, page: u32) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keyword = normalize_keyword(keyword)?;
        if page == 0 {
            return Err(SearchError::invalid_input("page numbers start at 1"));
        }

        let mut codes: Vec<String> = Vec::new();
        for code in facet_codes {
            let code = code.as_ref().trim();
            if !code.is_empty() && !codes.iter().any(|existing| existing == code) {
                codes.push(code.to_string());
            }
        }

        Ok(Self {
            keyword,
            sort,
            facet_codes: codes,
            page,
        })
    }

    /// Same query, different page
    pub fn at_page(&self, page: u32) -> CatalogResult<Self> {
        if page == 0 {
            return Err(SearchError::invalid_input("page numbers start at 1"));
        }
        Ok(Self {
            page,
            ..self.clone()
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn facet_codes(&self) -> &[String] {
        &self.facet_codes
    }

    pub const fn page(&self) -> u32 {
        self.page
    }
}

/// Trim a keyword, rejecting blank input
pub fn normalize_keyword(keyword: &str) -> CatalogResult<String> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(SearchError::invalid_input("keyword must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Outbound request descriptor: endpoint plus ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub endpoint: Url,
    pub params: Vec<(String, String)>,
}

impl SearchRequest {
    /// Final GET URL with the parameters form-encoded in order
    pub fn to_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().extend_pairs(self.params.iter());
        url
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One slice of a curated search: take `take` products in the catalog's `sort` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationBucket {
    pub sort: SortOrder,
    pub take: usize,
}

/// Mix of sort buckets used by curated searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationPlan {
    pub buckets: Vec<CurationBucket>,
}

impl CurationPlan {
    /// Upper bound on the curated result size
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.take).sum()
    }
}

impl Default for CurationPlan {
    /// 3 cheapest, 4 popular, 3 promoted
    fn default() -> Self {
        Self {
            buckets: vec![
                CurationBucket { sort: SortOrder::PriceAsc, take: 3 },
                CurationBucket { sort: SortOrder::Popular, take: 4 },
                CurationBucket { sort: SortOrder::Event, take: 3 },
            ],
        }
    }
}
