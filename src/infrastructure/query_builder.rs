//! Maps a [`SearchQuery`] onto the catalog's GET search endpoint

use url::Url;

use super::config::{ConfigError, SearchConfig, guidecom::params};
use crate::domain::{SearchQuery, SearchRequest};

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: Url,
}

impl QueryBuilder {
    pub fn new(base_url: &str, search_path: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(search_path))
            .map_err(|e| ConfigError::Validation {
                message: format!("invalid search endpoint {base_url}{search_path}: {e}"),
            })?;
        Ok(Self { endpoint })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, &config.search_path)
    }

    /// Pure mapping; `maker` is only sent for filtered queries
    pub fn build(&self, query: &SearchQuery) -> SearchRequest {
        let mut request_params = vec![
            (params::KEYWORD.to_string(), query.keyword().to_string()),
            (params::ORDER.to_string(), query.sort().as_token().to_string()),
        ];
        if !query.facet_codes().is_empty() {
            request_params.push((
                params::MAKER.to_string(),
                query.facet_codes().join(params::MAKER_SEPARATOR),
            ));
        }
        request_params.push((params::PAGE.to_string(), query.page().to_string()));

        SearchRequest {
            endpoint: self.endpoint.clone(),
            params: request_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortOrder;

    fn builder() -> QueryBuilder {
        QueryBuilder::from_config(&SearchConfig::default()).unwrap()
    }

    #[test]
    fn test_unfiltered_query() {
        let query = SearchQuery::new("SSD", SortOrder::PriceAsc, Vec::<String>::new(), 1).unwrap();
        let url = builder().build(&query).to_url();
        assert_eq!(
            url.as_str(),
            "https://www.guidecom.co.kr/search/index.html?keyword=SSD&order=price_0&page=1"
        );
    }

    #[test]
    fn test_facet_codes_joined_in_insertion_order() {
        let query = SearchQuery::new("그래픽카드", SortOrder::Popular, ["zotac", "asus", "zotac"], 3).unwrap();
        let request = builder().build(&query);

        assert_eq!(request.param("maker"), Some("zotac,asus"));
        assert_eq!(request.param("order"), Some("reco_goods"));
        assert_eq!(request.param("page"), Some("3"));
        assert_eq!(
            request.to_url().query(),
            Some("keyword=%EA%B7%B8%EB%9E%98%ED%94%BD%EC%B9%B4%EB%93%9C&order=reco_goods&maker=zotac%2Casus&page=3")
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let query = SearchQuery::new("ssd 1tb", SortOrder::Event, ["wd", "samsung"], 2).unwrap();
        let builder = builder();
        assert_eq!(builder.build(&query), builder.build(&query));
        assert_eq!(builder.build(&query).to_url().as_str(), builder.build(&query).to_url().as_str());
        assert_eq!(builder.build(&query).param("keyword"), Some("ssd 1tb"));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(QueryBuilder::new("not a url", "/search").is_err());
    }
}
