//! Listing deduplication
//!
//! The catalog repeats the same product across sponsored and regular slots, usually
//! with identical names but not always identical prices. The name is the only field
//! stable enough to key on; the first listing seen wins.

use std::collections::HashSet;

use crate::domain::Product;

/// Tracks which products have been seen, across any number of batches
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `product`; returns false when an equivalent one was already seen
    pub fn insert(&mut self, product: &Product) -> bool {
        self.seen.insert(product.identity_key())
    }
}

/// Stable dedup: keeps the first occurrence of every normalized name
pub fn dedupe(records: Vec<Product>) -> Vec<Product> {
    let mut deduplicator = Deduplicator::new();
    records
        .into_iter()
        .filter(|product| deduplicator.insert(product))
        .collect()
}
