//! Price ranking of deduplicated results

use std::cmp::Ordering;

use crate::domain::{CatalogResult, Product, SearchError};

/// Stable ascending sort by price key, unpriced entries last, truncated to `limit`
pub fn rank(records: Vec<Product>, limit: usize) -> CatalogResult<Vec<Product>> {
    if limit == 0 {
        return Err(SearchError::invalid_input("limit must be greater than 0"));
    }

    let mut keyed: Vec<(Option<f64>, Product)> = records
        .into_iter()
        .map(|product| (product.price_key(), product))
        .collect();

    // sort_by is stable: equal keys keep their incoming order
    keyed.sort_by(|(a, _), (b, _)| compare_price_keys(*a, *b));

    Ok(keyed
        .into_iter()
        .take(limit)
        .map(|(_, product)| product)
        .collect())
}

fn compare_price_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(name: &str, price: &str) -> Product {
        Product {
            name: name.to_string(),
            price: price.to_string(),
            specifications: String::new(),
        }
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_ascending_with_unpriced_last() {
        let ranked = rank(
            vec![
                product("unpriced-1", ""),
                product("mid", "120,000원"),
                product("inquiry", "가격문의"),
                product("cheap", "9,900원"),
                product("tie-a", "120,000원"),
            ],
            10,
        )
        .unwrap();

        assert_eq!(names(&ranked), vec!["cheap", "mid", "tie-a", "unpriced-1", "inquiry"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let ranked = rank(vec![product("c", "3"), product("a", "1"), product("b", "2")], 2).unwrap();
        assert_eq!(names(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(matches!(rank(vec![], 0), Err(SearchError::InvalidInput(_))));
    }

    fn arb_products() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec(prop::option::of(0u32..50), 0..30).prop_map(|prices| {
            prices
                .into_iter()
                .enumerate()
                .map(|(i, price)| product(&format!("p{i}"), &price.map(|p| format!("{p},000원")).unwrap_or_default()))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_rank_is_bounded_ordered_and_stable(records in arb_products(), limit in 1usize..40) {
            let ranked = rank(records.clone(), limit).unwrap();

            prop_assert_eq!(ranked.len(), limit.min(records.len()));

            let keys: Vec<Option<f64>> = ranked.iter().map(Product::price_key).collect();
            for pair in keys.windows(2) {
                prop_assert_ne!(compare_price_keys(pair[0], pair[1]), Ordering::Greater);
            }

            // Equal keys keep their original relative order
            let position = |p: &Product| records.iter().position(|r| r.name == p.name).unwrap();
            for pair in ranked.windows(2) {
                if compare_price_keys(pair[0].price_key(), pair[1].price_key()) == Ordering::Equal {
                    prop_assert!(position(&pair[0]) < position(&pair[1]));
                }
            }
        }
    }
}
