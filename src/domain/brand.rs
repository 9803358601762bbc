//! Brand names as they appear in product titles
//!
//! The catalog titles every product "<brand> <model> ...", in Korean or English and
//! with the occasional `[tag]` in front. Brands are compared in a normalized form
//! where known spellings of the same maker collapse to one name.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s._/-]+").expect("valid separator regex"));
static BRACKET_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]+\]").expect("valid tag regex"));
static TITLE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ /|-]").expect("valid split regex"));

/// Series, form factor and packaging words that lead some titles but are never brands
static NOT_A_BRAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(pro|ultra|max|mini|lite|plus|gaming|rog|tuf|strix|evo|neo|rgb|ddr|nvme|pcie|m\.2|sata|atx|matx|itx|oem|bulk|retail)$",
    )
    .expect("valid stop-word regex")
});

/// Alternate spelling -> canonical normalized brand
const ALIASES: &[(&str, &str)] = &[
    ("wd", "western digital"),
    ("웨스턴 디지털", "western digital"),
    ("웨스턴디지털", "western digital"),
    ("에이수스", "asus"),
    ("기가바이트", "gigabyte"),
    ("조텍", "zotac"),
    ("엔비디아", "nvidia"),
    ("삼성", "삼성전자"),
    ("samsung", "삼성전자"),
    ("g skill", "gskill"),
];

/// Canonical brand -> selection words that also mean it
const LOOSE_ALIASES: &[(&str, &[&str])] = &[
    ("western digital", &["wd", "western", "digital"]),
    ("삼성전자", &["samsung", "삼성"]),
    ("asus", &["에이수스"]),
    ("gigabyte", &["기가바이트"]),
    ("zotac", &["조텍"]),
    ("nvidia", &["엔비디아"]),
    ("tp link", &["tp-link"]),
];

/// Lowercase, separators collapsed to single spaces, known aliases resolved
pub fn normalize_brand(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = SEPARATORS.replace_all(&lowered, " ");
    let collapsed = collapsed.trim();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == collapsed)
        .map_or_else(|| collapsed.to_string(), |(_, canonical)| (*canonical).to_string())
}

/// Facet code for a brand label: normalized, spaces as underscores
pub fn brand_code(label: &str) -> String {
    normalize_brand(label).replace(' ', "_")
}

/// The brand token of a product title, as written
pub fn extract_brand(product_name: &str) -> Option<String> {
    let untagged = BRACKET_TAG.replace_all(product_name, " ");
    let text = untagged.split_whitespace().collect::<Vec<_>>().join(" ");

    TITLE_SPLIT
        .split(&text)
        .map(str::trim)
        .filter(|token| token.chars().count() >= 2)
        .find(|token| !NOT_A_BRAND.is_match(token))
        .map(str::to_string)
}

/// Whether the product's brand is one of the selected facet codes.
///
/// No selection matches everything; a title without a recognizable brand matches
/// no selection.
pub fn matches_any_brand<S: AsRef<str>>(product_name: &str, codes: &[S]) -> bool {
    if codes.is_empty() {
        return true;
    }
    let Some(brand) = extract_brand(product_name) else {
        return false;
    };
    let brand = normalize_brand(&brand);

    let selected: Vec<String> = codes
        .iter()
        .map(|code| normalize_brand(&code.as_ref().replace('_', " ")))
        .filter(|code| !code.is_empty())
        .collect();

    if selected
        .iter()
        .any(|code| brand == *code || brand.contains(code.as_str()) || code.contains(brand.as_str()))
    {
        return true;
    }

    LOOSE_ALIASES.iter().any(|(canonical, words)| {
        brand == *canonical && words.iter().any(|word| selected.iter().any(|code| code == word))
    })
}
