//! Upstream product-catalog API client
//!
//! Thin `reqwest` wrapper over the third-party product API (DummyJSON
//! shape). Payloads are decoded to `serde_json::Value` and passed through
//! untouched — the gateway never reshapes what the upstream returns.

use serde::Deserialize;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::{Error, Result};

/// Paging and search parameters accepted by the listing routes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    /// Page size
    pub limit: u32,
    /// Offset into the result set
    pub skip: u32,
    /// Full-text search term; blank values are treated as absent
    pub q: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            limit: 12,
            skip: 0,
            q: None,
        }
    }
}

impl ProductQuery {
    /// The trimmed search term, if one was supplied and is non-blank
    fn search_term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Client for the upstream product API
#[derive(Clone)]
pub struct ProductClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Create a client with the configured base URL and request timeout
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a product listing page.
    ///
    /// A non-blank `q` switches to the upstream search endpoint; paging
    /// parameters are forwarded either way.
    pub async fn fetch_products(&self, query: &ProductQuery) -> Result<Value> {
        let request = if let Some(q) = query.search_term() {
            self.client
                .get(format!("{}/products/search", self.base_url))
                .query(&[("q", q)])
                .query(&[("limit", query.limit), ("skip", query.skip)])
        } else {
            self.client
                .get(format!("{}/products", self.base_url))
                .query(&[("limit", query.limit), ("skip", query.skip)])
        };

        self.get_json(request).await
    }

    /// Fetch the category list
    pub async fn fetch_categories(&self) -> Result<Value> {
        let request = self
            .client
            .get(format!("{}/products/categories", self.base_url));
        self.get_json(request).await
    }

    /// Fetch a product listing page for one category
    pub async fn fetch_by_category(&self, category: &str, query: &ProductQuery) -> Result<Value> {
        let request = self
            .client
            .get(format!("{}/products/category/{category}", self.base_url))
            .query(&[("limit", query.limit), ("skip", query.skip)]);
        self.get_json(request).await
    }

    /// Fetch a single product record by id
    pub async fn fetch_product(&self, id: &str) -> Result<Value> {
        let request = self.client.get(format!("{}/products/{id}", self.base_url));
        self.get_json(request).await
    }

    /// Send a request, reject non-success statuses, decode the JSON body
    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                // Truncate to keep error responses bounded
                body: body.chars().take(500).collect(),
            });
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_query_defaults() {
        let query: ProductQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.limit, 12);
        assert_eq!(query.skip, 0);
        assert_eq!(query.q, None);
    }

    #[test]
    fn test_blank_search_term_is_absent() {
        let query = ProductQuery {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), None);

        let query = ProductQuery {
            q: Some("  phone ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), Some("phone"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = UpstreamConfig {
            base_url: "https://dummyjson.com/".to_string(),
            ..Default::default()
        };
        let client = ProductClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://dummyjson.com");
    }
}
