//! Product list parser
//!
//! Turns one result page into normalized [`Product`]s. Extraction is delegated to a
//! [`MarkupExtractor`]; this layer applies the record policy: unnamed entries are
//! dropped, everything else is kept with whatever fields it had.

use std::sync::Arc;

use tracing::debug;

use super::{GuidecomMarkup, MarkupExtractor, ParsingConfig};
use crate::domain::Product;
use crate::domain::parsing_error::ParsingResult;

/// Parser for extracting products from result pages
#[derive(Clone)]
pub struct ProductListParser {
    extractor: Arc<dyn MarkupExtractor>,
}

impl ProductListParser {
    /// Parser over the default Guidecom selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Parser over custom Guidecom selectors
    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self::with_extractor(Arc::new(GuidecomMarkup::with_config(config)?)))
    }

    /// Parser over any extractor implementation
    pub fn with_extractor(extractor: Arc<dyn MarkupExtractor>) -> Self {
        Self { extractor }
    }

    /// Parse one page. Output order equals document order.
    pub fn parse(&self, markup: &str) -> ParsingResult<Vec<Product>> {
        let listings = self.extractor.extract_listings(markup)?;
        let found = listings.len();

        let products: Vec<Product> = listings
            .into_iter()
            .enumerate()
            .filter_map(|(index, listing)| {
                let product = Product::from_listing(listing);
                if product.is_none() {
                    debug!("Skipping unnamed entry at index {}", index);
                }
                product
            })
            .collect();

        debug!("Parsed {} products from {} entries", products.len(), found);
        Ok(products)
    }

    pub fn extractor(&self) -> &Arc<dyn MarkupExtractor> {
        &self.extractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawListing, SearchFacet};
    use crate::domain::parsing_error::ParsingError;

    fn goods_row(name: Option<&str>, price: Option<&str>, highlights: &[String]) -> String {
        let name = name
            .map(|n| format!(r#"<div class="goodsname1">{n}</div>"#))
            .unwrap_or_default();
        let price = price
            .map(|p| format!(r#"<div class="prices"><div class="price-large"><span>{p}</span></div></div>"#))
            .unwrap_or_default();
        let specs: String = highlights.iter().map(|h| format!("<li>{h}</li>")).collect();
        format!(r#"<div class="goods-row"><div class="desc">{name}<ul class="spec">{specs}</ul></div>{price}</div>"#)
    }

    fn result_page(rows: &[String]) -> String {
        format!(r#"<html><body><div id="goods-list">{}</div></body></html>"#, rows.concat())
    }

    #[test]
    fn test_parser_creation() {
        assert!(ProductListParser::new().is_ok());
    }

    #[test]
    fn test_three_named_entries_and_one_unnamed() {
        let specs = vec!["NVMe".to_string()];
        let markup = result_page(&[
            goods_row(Some("Samsung 990 PRO"), Some("189000"), &specs),
            goods_row(Some("WD Black SN850X"), Some("159,000"), &specs),
            goods_row(None, Some("99,000"), &specs),
            goods_row(Some("Crucial P3"), Some("79,000"), &specs),
        ]);

        let products = ProductListParser::new().unwrap().parse(&markup).unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Samsung 990 PRO", "WD Black SN850X", "Crucial P3"]);
        assert_eq!(products[0].price, "189,000원");
    }

    #[test]
    fn test_ten_highlights_keep_first_eight() {
        let specs: Vec<String> = (1..=10).map(|i| format!("h{i}")).collect();
        let markup = result_page(&[goods_row(Some("SSD"), Some("1000"), &specs)]);

        let products = ProductListParser::new().unwrap().parse(&markup).unwrap();
        assert_eq!(products[0].specifications, "h1 / h2 / h3 / h4 / h5 / h6 / h7 / h8");
    }

    #[test]
    fn test_missing_price_retained() {
        let markup = result_page(&[goods_row(Some("SSD"), None, &[])]);

        let products = ProductListParser::new().unwrap().parse(&markup).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, "");
        assert_eq!(products[0].specifications, "");
    }

    #[test]
    fn test_container_missing_propagates() {
        let err = ProductListParser::new().unwrap().parse("<html><body><p>maintenance</p></body></html>");
        assert!(matches!(err, Err(ParsingError::ContainerNotFound { .. })));
    }

    struct FixedExtractor;

    impl MarkupExtractor for FixedExtractor {
        fn extract_listings(&self, _markup: &str) -> ParsingResult<Vec<RawListing>> {
            Ok(vec![
                RawListing {
                    name: Some("from another layout".to_string()),
                    price: Some("KRW 5,000".to_string()),
                    highlights: vec![],
                },
                RawListing::default(),
            ])
        }

        fn extract_facets(&self, _markup: &str) -> Vec<SearchFacet> {
            Vec::new()
        }
    }

    #[test]
    fn test_custom_extractor() {
        let parser = ProductListParser::with_extractor(Arc::new(FixedExtractor));
        let products = parser.parse("ignored").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, "5,000원");
    }
}
