use crate::error::ApiError;
use crate::responses::{GraphQlResponse, MetricsData};
use async_trait::async_trait;
use chrono::Utc;
use configuration::ShopifyConfig;
use core_types::{DateRange, LiveMetrics, StoreInfo};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

pub mod error;
pub mod responses;
pub mod summary;
// --- Public API ---
pub use summary::summarize_metrics;

/// The abstract interface for anything that can produce a store metrics snapshot.
/// The web server and the CLI only talk to this trait, allowing the underlying
/// implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// The store this provider reads from.
    fn store(&self) -> StoreInfo;

    /// Fetches orders and customers for `range` and aggregates them.
    async fn fetch_metrics(&self, range: &DateRange) -> Result<LiveMetrics, ApiError>;
}

/// A concrete implementation of the `MetricsProvider` for the Shopify Admin GraphQL API.
#[derive(Clone)]
pub struct ShopifyClient {
    client: reqwest::Client,
    endpoint: String,
    store: StoreInfo,
    page_size: u32,
    conversion_rate: f64,
}

impl ShopifyClient {
    /// Builds a client for `https://<store_domain>/admin/api/<api_version>/graphql.json`.
    ///
    /// `conversion_rate` is reported verbatim in every snapshot.
    pub fn new(config: &ShopifyConfig, conversion_rate: f64) -> Result<Self, ApiError> {
        if !config.is_configured() {
            return Err(ApiError::NotConfigured);
        }
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.store_domain.trim(),
            config.api_version
        );
        Self::with_endpoint(config, endpoint, conversion_rate)
    }

    /// Like `new`, but against an arbitrary endpoint URL.
    pub fn with_endpoint(
        config: &ShopifyConfig,
        endpoint: String,
        conversion_rate: f64,
    ) -> Result<Self, ApiError> {
        let mut token = HeaderValue::from_str(config.admin_api_token.trim())
            .map_err(|_| ApiError::InvalidData("Access token is not a valid header value".to_string()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("X-Shopify-Access-Token", token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            store: StoreInfo::from_domain(config.store_domain.trim()),
            page_size: config.page_size,
            conversion_rate,
        })
    }

    async fn query<T: serde::de::DeserializeOwned>(&self, query: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GraphQlResponse<T> = serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        if !parsed.errors.is_empty() {
            let messages: Vec<&str> = parsed.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(ApiError::GraphQl(messages.join("; ")));
        }

        parsed
            .data
            .ok_or_else(|| ApiError::InvalidData("GraphQL response has no data".to_string()))
    }
}

/// The metrics query: orders created inside the window, plus the store's customers.
pub fn build_metrics_query(range: &DateRange, page_size: u32) -> String {
    let start = range.start_day().format("%Y-%m-%d");
    let end = range.end_day().format("%Y-%m-%d");

    format!(
        r#"query GetMetrics {{
  orders(first: {page_size}, query: "created_at:>={start} AND created_at:<={end}") {{
    edges {{
      node {{
        id
        createdAt
        totalPriceSet {{
          shopMoney {{
            amount
            currencyCode
          }}
        }}
      }}
    }}
  }}
  customers(first: {page_size}) {{
    edges {{
      node {{
        id
        numberOfOrders
        createdAt
      }}
    }}
  }}
}}"#
    )
}

#[async_trait]
impl MetricsProvider for ShopifyClient {
    fn store(&self) -> StoreInfo {
        self.store.clone()
    }

    async fn fetch_metrics(&self, range: &DateRange) -> Result<LiveMetrics, ApiError> {
        tracing::info!(
            shop = %self.store.domain,
            start = %range.start_day(),
            end = %range.end_day(),
            "Fetching store metrics."
        );

        let query = build_metrics_query(range, self.page_size);
        let data: MetricsData = self.query(&query).await.inspect_err(|e| {
            tracing::error!(error = %e, shop = %self.store.domain, "Failed to fetch Shopify metrics.");
        })?;

        let orders = data.orders.into_nodes();
        let customers = data.customers.into_nodes();
        tracing::debug!(orders = orders.len(), customers = customers.len(), "Aggregating metrics.");

        summarize_metrics(&orders, &customers, self.conversion_rate, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const PATH: &str = "/admin/api/2025-10/graphql.json";

    fn config() -> ShopifyConfig {
        ShopifyConfig {
            store_domain: "acme.myshopify.com".to_string(),
            admin_api_token: "shpat_test".to_string(),
            ..ShopifyConfig::default()
        }
    }

    fn range() -> DateRange {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        DateRange::new(start, end).unwrap()
    }

    fn client_for(server: &Server) -> ShopifyClient {
        ShopifyClient::with_endpoint(&config(), format!("{}{}", server.url(), PATH), 2.3).unwrap()
    }

    #[test]
    fn test_new_requires_credentials() {
        assert!(matches!(
            ShopifyClient::new(&ShopifyConfig::default(), 2.3),
            Err(ApiError::NotConfigured)
        ));

        let client = ShopifyClient::new(&config(), 2.3).unwrap();
        assert_eq!(client.store().name, "acme");
    }

    #[test]
    fn test_query_filters_orders_by_day() {
        let query = build_metrics_query(&range(), 250);

        assert!(query.contains(r#"orders(first: 250, query: "created_at:>=2025-01-01 AND created_at:<=2025-01-31")"#));
        assert!(query.contains("customers(first: 250)"));
        assert!(query.contains("numberOfOrders"));
    }

    #[tokio::test]
    async fn test_fetch_metrics_aggregates_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-shopify-access-token", "shpat_test")
            .match_body(Matcher::Regex("GetMetrics".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {
                        "orders": {"edges": [
                            {"node": {"totalPriceSet": {"shopMoney": {"amount": "80.00", "currencyCode": "USD"}}}},
                            {"node": {"totalPriceSet": {"shopMoney": {"amount": "90.00", "currencyCode": "USD"}}}}
                        ]},
                        "customers": {"edges": [
                            {"node": {"numberOfOrders": "1"}},
                            {"node": {"numberOfOrders": "4"}}
                        ]}
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let metrics = client_for(&server).fetch_metrics(&range()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(metrics.orders.count, 2);
        assert_eq!(metrics.orders.average_value, 85.0);
        assert_eq!(metrics.customers.returning, 1);
        assert_eq!(metrics.customers.retention_rate, 50.0);
        assert_eq!(metrics.conversion_rate, 2.3);
    }

    #[tokio::test]
    async fn test_fetch_metrics_surfaces_graphql_errors() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(json!({"errors": [{"message": "Throttled"}, {"message": "Access denied"}]}).to_string())
            .create_async()
            .await;

        let result = client_for(&server).fetch_metrics(&range()).await;

        match result {
            Err(ApiError::GraphQl(message)) => assert_eq!(message, "Throttled; Access denied"),
            other => panic!("expected GraphQl error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_metrics_surfaces_http_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(401)
            .with_body("Invalid API key or access token")
            .create_async()
            .await;

        let result = client_for(&server).fetch_metrics(&range()).await;

        assert!(matches!(result, Err(ApiError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_fetch_metrics_rejects_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client_for(&server).fetch_metrics(&range()).await;

        assert!(matches!(result, Err(ApiError::Deserialization(_))));
    }
}
