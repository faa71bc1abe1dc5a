//! `reqwest` client for the restaurant REST services.

use super::DataSource;
use crate::config::ServicesConfig;
use crate::error::FetchError;
use crate::store::{
    ActivityLogRecord, CategoryRecord, OrderRecord, ProductRecord, ReservationRecord,
};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fetches every collection with a plain `GET` against its configured URL.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    services: ServicesConfig,
    bearer_token: Option<String>,
}

impl HttpDataSource {
    pub fn new(
        services: ServicesConfig,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            services,
            bearer_token,
        })
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        url: &str,
    ) -> Result<Vec<T>, FetchError> {
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| FetchError::Http { collection, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                collection,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Http { collection, source })?;

        // Some services answer `null` instead of `[]` when empty.
        let records: Vec<T> = serde_json::from_slice::<Option<Vec<T>>>(&body)
            .map_err(|source| FetchError::Decode { collection, source })?
            .unwrap_or_default();

        tracing::debug!(collection, count = records.len(), "Fetched upstream collection");
        Ok(records)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn orders(&self) -> Result<Vec<OrderRecord>, FetchError> {
        self.get_collection("orders", &self.services.orders_url).await
    }

    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError> {
        self.get_collection("products", &self.services.products_url)
            .await
    }

    async fn categories(&self) -> Result<Vec<CategoryRecord>, FetchError> {
        self.get_collection("categories", &self.services.categories_url)
            .await
    }

    async fn reservations(&self) -> Result<Vec<ReservationRecord>, FetchError> {
        self.get_collection("reservations", &self.services.reservations_url)
            .await
    }

    async fn activity_logs(&self) -> Result<Vec<ActivityLogRecord>, FetchError> {
        self.get_collection("logs", &self.services.logs_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;

    async fn orders_handler(headers: HeaderMap) -> impl IntoResponse {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer test-token");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, String::new());
        }
        (
            StatusCode::OK,
            r#"[{"id": 1, "orderDate": "2025-02-01T12:00:00", "totalAmount": 9.5,
                "customerName": "Ion", "orderItems": [{"productId": 3, "quantity": 1, "priceAtOrder": 9.5}]}]"#
                .to_string(),
        )
    }

    /// Serves canned upstream responses on an ephemeral port.
    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/orders", get(orders_handler))
            .route("/products", get(|| async { "null" }))
            .route("/categories", get(|| async { "{not json" }))
            .route(
                "/reservations",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
            )
            .route("/logs", get(|| async { "[]" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn services(base: &str) -> ServicesConfig {
        ServicesConfig {
            orders_url: format!("{base}/orders"),
            products_url: format!("{base}/products"),
            categories_url: format!("{base}/categories"),
            reservations_url: format!("{base}/reservations"),
            logs_url: format!("{base}/logs"),
        }
    }

    #[tokio::test]
    async fn test_fetches_with_bearer_token() {
        let base = spawn_upstream().await;
        let source = HttpDataSource::new(
            services(&base),
            Some("test-token".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let orders = source.orders().await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer_name, "Ion");
        assert_eq!(orders[0].order_items[0].product_id, 3);
    }

    #[tokio::test]
    async fn test_missing_token_is_status_error() {
        let base = spawn_upstream().await;
        let source = HttpDataSource::new(services(&base), None, Duration::from_secs(5)).unwrap();

        let err = source.orders().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                collection: "orders",
                status: 401
            }
        ));
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let base = spawn_upstream().await;
        let source = HttpDataSource::new(services(&base), None, Duration::from_secs(5)).unwrap();

        assert!(source.products().await.unwrap().is_empty());
        assert!(source.activity_logs().await.unwrap().is_empty());
        assert!(matches!(
            source.categories().await.unwrap_err(),
            FetchError::Decode { .. }
        ));
        assert!(matches!(
            source.reservations().await.unwrap_err(),
            FetchError::Status { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let source = HttpDataSource::new(
            services("http://127.0.0.1:1"),
            None,
            Duration::from_secs(2),
        )
        .unwrap();

        let err = source.orders().await.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
        assert_eq!(err.collection(), "orders");
    }
}
