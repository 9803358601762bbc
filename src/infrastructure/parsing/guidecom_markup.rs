//! scraper-based extractor for Guidecom search result pages
//!
//! Handles both the full search page (`#goods-list` inside the page layout) and the
//! bare `goods-row` fragments the site returns to its own list refreshes.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::ParsingConfig;
use super::MarkupExtractor;
use crate::domain::product::collapse_whitespace;
use crate::domain::{RawListing, SearchFacet};
use crate::domain::parsing_error::{ParsingError, ParsingResult};

/// Trailing item counts on facet labels, e.g. "삼성전자 (12)"
static LABEL_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(\s*\d[\d,]*\s*\)\s*$").expect("static regex"));

static LABEL_ELEMENT: Lazy<Selector> = Lazy::new(|| Selector::parse("label").expect("static selector"));

/// Separator used by single-text spec blocks
const SPEC_BLOCK_SEPARATOR: char = '/';

pub struct GuidecomMarkup {
    container_names: Vec<String>,
    containers: Vec<Selector>,
    entries: Vec<Selector>,
    names: Vec<Selector>,
    prices: Vec<Selector>,
    highlights: Vec<Selector>,
    spec_blocks: Vec<Selector>,
    empty_markers: Vec<Selector>,
    facet_sections: Vec<Selector>,
    facet_items: Vec<Selector>,
    code_attributes: Vec<String>,
    code_query_param: String,
}

impl GuidecomMarkup {
    /// Extractor with the default Guidecom selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Extractor with custom selector configuration
    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let list = &config.product_list;
        let facets = &config.facets;
        Ok(Self {
            container_names: list.container.clone(),
            containers: compile_selectors(&list.container)?,
            entries: compile_selectors(&list.entry)?,
            names: compile_selectors(&list.name)?,
            prices: compile_selectors(&list.price)?,
            highlights: compile_selectors(&list.highlight)?,
            spec_blocks: compile_selectors(&list.spec_block)?,
            empty_markers: compile_selectors(&list.empty_result)?,
            facet_sections: compile_selectors(&facets.section)?,
            facet_items: compile_selectors(&facets.item)?,
            code_attributes: facets.code_attributes.clone(),
            code_query_param: facets.code_query_param.clone(),
        })
    }

    /// Entries under `scope`, using the first entry selector that matches anything
    fn select_entries<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.entries
            .iter()
            .map(|selector| scope.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    fn locate_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.containers
            .iter()
            .find_map(|selector| document.select(selector).next())
    }

    fn has_empty_marker(&self, document: &Html) -> bool {
        self.empty_markers
            .iter()
            .any(|selector| document.select(selector).next().is_some())
    }

    fn extract_listing(&self, entry: ElementRef<'_>) -> RawListing {
        RawListing {
            name: first_text(entry, &self.names),
            price: first_text(entry, &self.prices),
            highlights: self.extract_highlights(entry),
        }
    }

    /// Marked-up fragments first; otherwise split the first spec block
    fn extract_highlights(&self, entry: ElementRef<'_>) -> Vec<String> {
        for selector in &self.highlights {
            let fragments: Vec<String> = entry
                .select(selector)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect();
            if !fragments.is_empty() {
                return fragments;
            }
        }

        first_text(entry, &self.spec_blocks)
            .map(|block| {
                block
                    .split(SPEC_BLOCK_SEPARATOR)
                    .map(str::trim)
                    .filter(|fragment| !fragment.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn facet_from_item(&self, section: ElementRef<'_>, item: ElementRef<'_>) -> Option<SearchFacet> {
        let element = item.value();

        let code = self
            .code_attributes
            .iter()
            .filter_map(|attr| element.attr(attr))
            .map(str::trim)
            .find(|code| !code.is_empty())
            .map(str::to_string)
            .or_else(|| element.attr("href").and_then(|href| query_param(href, &self.code_query_param)))?;

        let label = Some(clean_label(&element_text(item)))
            .filter(|label| !label.is_empty())
            .or_else(|| element.attr("title").map(clean_label).filter(|label| !label.is_empty()))
            .or_else(|| enclosing_label(item))
            .or_else(|| element.id().and_then(|id| label_for(section, id)));

        match label {
            Some(label) => Some(SearchFacet { code, label }),
            None => {
                debug!("Skipping facet '{}' without a label", code);
                None
            }
        }
    }
}

impl MarkupExtractor for GuidecomMarkup {
    fn extract_listings(&self, markup: &str) -> ParsingResult<Vec<RawListing>> {
        let document = Html::parse_document(markup);

        let entries = match self.locate_container(&document) {
            Some(container) => self.select_entries(container),
            // Rows elsewhere on a no-results page are recommendations, not matches
            None if self.has_empty_marker(&document) => {
                debug!("Result page reports no matching products");
                return Ok(Vec::new());
            }
            None => {
                // Bare fragment responses carry the rows without the surrounding layout
                let fragment_entries = self.select_entries(document.root_element());
                if fragment_entries.is_empty() {
                    warn!("Product list container not found in {} bytes of markup", markup.len());
                    return Err(ParsingError::container_not_found(self.container_names.clone()));
                }
                debug!("No list container, using {} top-level entries", fragment_entries.len());
                fragment_entries
            }
        };

        debug!("Found {} product entries", entries.len());
        Ok(entries.into_iter().map(|entry| self.extract_listing(entry)).collect())
    }

    fn extract_facets(&self, markup: &str) -> Vec<SearchFacet> {
        let document = Html::parse_document(markup);

        let Some(section) = self
            .facet_sections
            .iter()
            .find_map(|selector| document.select(selector).next())
        else {
            debug!("No manufacturer filter section on page");
            return Vec::new();
        };

        for selector in &self.facet_items {
            let items: Vec<ElementRef> = section.select(selector).collect();
            if items.is_empty() {
                continue;
            }
            let facets: Vec<SearchFacet> = items
                .into_iter()
                .filter_map(|item| self.facet_from_item(section, item))
                .collect();
            debug!("Extracted {} manufacturer facets", facets.len());
            return facets;
        }

        debug!("Manufacturer filter section has no recognizable options");
        Vec::new()
    }
}

/// Compile multiple selector strings; a bad selector is a configuration error
fn compile_selectors(selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    selector_strings
        .iter()
        .map(|selector| {
            Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, &e.to_string()))
        })
        .collect()
}

/// Whitespace-collapsed text of an element, nested nodes joined by spaces
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first non-empty match, trying selectors in order
fn first_text(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        scope
            .select(selector)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

fn clean_label(text: &str) -> String {
    LABEL_COUNT.replace(&collapse_whitespace(text), "").into_owned()
}

fn enclosing_label(item: ElementRef<'_>) -> Option<String> {
    item.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "label")
        .map(|label| clean_label(&element_text(label)))
        .filter(|label| !label.is_empty())
}

fn label_for(section: ElementRef<'_>, id: &str) -> Option<String> {
    section
        .select(&LABEL_ELEMENT)
        .filter(|label| label.value().attr("for") == Some(id))
        .map(|label| clean_label(&element_text(label)))
        .find(|label| !label.is_empty())
}

/// Value of `name` in the query string of a (possibly relative) link
fn query_param(href: &str, name: &str) -> Option<String> {
    let query = href.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
