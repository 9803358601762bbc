//! Shared test support: a scripted in-memory fetcher and result-page fixtures
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use guidecom_search::{CancellationToken, FetchError, PageFetcher, SearchConfig, SearchRequest};

type Reply = Result<String, FetchError>;

/// Serves canned markup keyed by `(order, page)` or by page alone, recording every
/// request it receives. Unscripted pages get an empty result page.
#[derive(Default)]
pub struct ScriptedFetcher {
    by_page: HashMap<u32, Reply>,
    by_order: HashMap<(String, u32), Reply>,
    cancel_after: Option<(u32, CancellationToken)>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, markup: impl Into<String>) -> Self {
        self.by_page.insert(page, Ok(markup.into()));
        self
    }

    pub fn failing_page(mut self, page: u32, error: FetchError) -> Self {
        self.by_page.insert(page, Err(error));
        self
    }

    pub fn order_page(mut self, order: &str, page: u32, markup: impl Into<String>) -> Self {
        self.by_order.insert((order.to_string(), page), Ok(markup.into()));
        self
    }

    pub fn failing_order(mut self, order: &str, page: u32, error: FetchError) -> Self {
        self.by_order.insert((order.to_string(), page), Err(error));
        self
    }

    /// Cancel `token` right after `page` has been served
    pub fn cancel_after(mut self, page: u32, token: CancellationToken) -> Self {
        self.cancel_after = Some((page, token));
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests()
            .iter()
            .map(|request| request.param("page").unwrap().parse().unwrap())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &SearchRequest) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        let page: u32 = request.param("page").unwrap().parse().unwrap();
        let order = request.param("order").unwrap_or_default().to_string();

        let reply = self
            .by_order
            .get(&(order, page))
            .or_else(|| self.by_page.get(&page))
            .cloned()
            .unwrap_or_else(|| Ok(empty_results_page()));

        if let Some((after, token)) = &self.cancel_after {
            if *after == page {
                token.cancel();
            }
        }
        reply
    }
}

/// Config with the inter-page pause disabled
pub fn test_config() -> SearchConfig {
    SearchConfig {
        page_delay_ms: 0,
        ..SearchConfig::default()
    }
}

pub fn transport_error(url: &str) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: "connection reset".to_string(),
    }
}

pub fn row(name: &str, price: &str) -> String {
    format!(
        r#"<div class="goods-row"><div class="desc"><h4 class="title"><a href="/goods/1" class="goodsname1">{name}</a></h4><ul class="spec"><li>M.2 2280</li><li>NVMe</li></ul></div><div class="prices"><div class="price-large"><span>{price}</span>원</div></div></div>"#
    )
}

pub fn unnamed_row(price: &str) -> String {
    format!(r#"<div class="goods-row"><div class="desc"><ul class="spec"><li>광고</li></ul></div><div class="prices"><div class="price-large"><span>{price}</span>원</div></div></div>"#)
}

pub fn unpriced_row(name: &str) -> String {
    format!(r#"<div class="goods-row"><div class="desc"><h4 class="title"><a href="/goods/2" class="goodsname1">{name}</a></h4></div></div>"#)
}

pub fn results_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><div id="header">Guidecom</div><div id="goods-placeholder"><div id="goods-list">{}</div></div></body></html>"#,
        rows.concat()
    )
}

/// `count` distinct rows named `{prefix}-{i}`, priced from `base` upward
pub fn numbered_rows(prefix: &str, count: usize, base: u32) -> Vec<String> {
    (0..count)
        .map(|i| row(&format!("{prefix}-{i}"), &format!("{}", base + i as u32 * 1000)))
        .collect()
}

pub fn empty_results_page() -> String {
    r#"<html><body><div id="header">Guidecom</div><div id="goods-none">검색 결과가 없습니다.</div></body></html>"#.to_string()
}

pub fn facet_page(makers: &[(&str, &str)]) -> String {
    let items: String = makers
        .iter()
        .map(|(code, label)| format!(r#"<label><input type="checkbox" name="maker" value="{code}"> {label}</label>"#))
        .collect();
    format!(
        r#"<html><body><div id="search-maker">{items}</div><div id="goods-list">{}</div></body></html>"#,
        row("Samsung 990 PRO 1TB", "189,000")
    )
}
