use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Highlight fragments carried into `Product::specifications`
pub const MAX_HIGHLIGHTS: usize = 8;

/// Joins highlight fragments in `Product::specifications`
pub const HIGHLIGHT_SEPARATOR: &str = " / ";

/// Currency suffix used by the catalog's price display
pub const PRICE_SUFFIX: &str = "원";

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").expect("static regex"));

/// One catalog entry exactly as the markup presented it
///
/// Every field may be absent; [`Product::from_listing`] decides what each absence means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub name: Option<String>,
    pub price: Option<String>,
    pub highlights: Vec<String>,
}

/// Normalized catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub specifications: String,
}

impl Product {
    /// Normalize a raw listing. Listings without a usable name yield `None`;
    /// a missing price becomes an empty string.
    pub fn from_listing(listing: RawListing) -> Option<Self> {
        let name = listing
            .name
            .map(|name| collapse_whitespace(&name))
            .filter(|name| !name.is_empty())?;

        let price = listing.price.as_deref().map(format_price).unwrap_or_default();

        let specifications = listing
            .highlights
            .iter()
            .map(|fragment| collapse_whitespace(fragment))
            .filter(|fragment| !fragment.is_empty())
            .take(MAX_HIGHLIGHTS)
            .collect::<Vec<_>>()
            .join(HIGHLIGHT_SEPARATOR);

        Some(Self {
            name,
            price,
            specifications,
        })
    }

    /// Numeric ordering key derived from the display price
    pub fn price_key(&self) -> Option<f64> {
        price_key(&self.price)
    }

    /// Key under which two listings count as the same product
    pub fn identity_key(&self) -> String {
        collapse_whitespace(&self.name).to_lowercase()
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render source price text in the catalog's display form (`"123,450원"`).
///
/// Text without any digits ("가격문의") is kept as-is, whitespace collapsed.
pub fn format_price(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().map_or_else(
        |_| collapse_whitespace(text),
        |value| format!("{}{PRICE_SUFFIX}", group_thousands(value)),
    )
}

/// Strip formatting characters and parse what is left
pub fn price_key(price: &str) -> Option<f64> {
    let numeric = NON_NUMERIC.replace_all(price, "");
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
