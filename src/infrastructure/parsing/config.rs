//! Parsing configuration for Guidecom result pages
//!
//! Centralized CSS selectors. Every list is tried in order; the first selector that
//! matches wins, so the most specific one goes first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Product list selectors
    pub product_list: ProductListSelectors,

    /// Manufacturer filter selectors
    pub facets: FacetSelectors,
}

/// CSS selectors for the product list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductListSelectors {
    /// Product list container - multiple fallbacks
    pub container: Vec<String>,

    /// One product entry inside the container
    pub entry: Vec<String>,

    /// Product name inside an entry
    pub name: Vec<String>,

    /// Price text inside an entry
    pub price: Vec<String>,

    /// Individual highlight fragments inside an entry
    pub highlight: Vec<String>,

    /// Single-text spec block, split on `/` when no fragments are marked up
    pub spec_block: Vec<String>,

    /// Markers of a legitimate "no results" page
    pub empty_result: Vec<String>,
}

impl Default for ProductListSelectors {
    fn default() -> Self {
        Self {
            container: vec![
                "#goods-list".to_string(),
                "#goods-placeholder #goods-list".to_string(),
                ".goods-list".to_string(),
            ],
            entry: vec!["div.goods-row".to_string(), ".goods-row".to_string()],
            name: vec![
                ".desc .goodsname1".to_string(),
                ".desc h4.title a".to_string(),
                "h4.title a".to_string(),
            ],
            price: vec![
                ".prices .price-large span".to_string(),
                ".price-large span".to_string(),
                ".price-large".to_string(),
            ],
            highlight: vec![".desc .spec li".to_string(), ".desc li".to_string()],
            spec_block: vec![".desc .spec".to_string()],
            empty_result: vec![
                "#goods-none".to_string(),
                ".goods-none".to_string(),
                ".search-none".to_string(),
                ".no-result".to_string(),
            ],
        }
    }
}

/// CSS selectors for the manufacturer filter section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetSelectors {
    /// Filter section containing the manufacturer options
    pub section: Vec<String>,

    /// One selectable option inside the section
    pub item: Vec<String>,

    /// Attributes carrying the facet code, in order of preference
    pub code_attributes: Vec<String>,

    /// Query parameter carrying the code when an option is a link
    pub code_query_param: String,
}

impl Default for FacetSelectors {
    fn default() -> Self {
        Self {
            section: vec![
                "#search-maker".to_string(),
                "#maker-list".to_string(),
                ".search-filter .maker".to_string(),
                ".filter-maker".to_string(),
                "dl.maker".to_string(),
            ],
            item: vec![
                "input[name='maker']".to_string(),
                "input[name='maker[]']".to_string(),
                "[data-maker]".to_string(),
                "a[href*='maker=']".to_string(),
            ],
            code_attributes: vec![
                "data-maker".to_string(),
                "data-code".to_string(),
                "value".to_string(),
            ],
            code_query_param: "maker".to_string(),
        }
    }
}
