//! # HTTP Backend
//!
//! [`Backend`] over the JSON REST API, using `reqwest`.
//!
//! ## Response Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Response → Result                                    │
//! │                                                                         │
//! │  no response / reset ──────────────────► Transport                     │
//! │  request_timeout elapsed ──────────────► Timeout                       │
//! │  POST /sale: sale_timeout instead ─────► Timeout                       │
//! │  2xx, {success: true, ...} ────────────► Ok(data)                      │
//! │  2xx, {success: false, error} ─────────► Rejected(error)               │
//! │  non-2xx, {success: false, error} ─────► Rejected(error)               │
//! │  non-2xx, anything else ───────────────► Http { status, body }         │
//! │  body not the expected shape ──────────► Malformed                     │
//! │                                                                         │
//! │  GET /product/<code> with 404 ─────────► Ok(None)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use mostrador_core::{DailySummary, Product, SaleConfirmation, SaleOrder, SaleRecord, StockAlert};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::backend::{Backend, HistoryQuery};
use crate::config::ClientConfig;
use crate::error::{BackendError, BackendResult, ClientError, ClientResult};
use crate::wire::{
    AlertsResponse, Envelope, FailureBody, HistoryRow, InventoryRow, ProductDto, SaleRequest,
    SaleResponse, SummaryDto,
};

/// HTTP client for the inventory backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    /// Per-request override for `POST /sale`.
    sale_timeout: Duration,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: Url, request_timeout: Duration) -> ClientResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {}", e)))?;

        Ok(HttpBackend {
            client,
            base_url,
            request_timeout,
            sale_timeout: request_timeout,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(config.base_url()?, config.request_timeout())?.with_sale_timeout(config.sale_timeout()))
    }

    /// Bounds `POST /sale` by `timeout` instead of the client-wide request timeout.
    pub fn with_sale_timeout(mut self, timeout: Duration) -> Self {
        self.sale_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn transport_error(err: reqwest::Error, limit: Duration) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(limit)
        } else {
            BackendError::from(err)
        }
    }

    /// Reads the body, mapping non-2xx statuses to `Rejected` or `Http`.
    async fn read_body<T: DeserializeOwned>(&self, response: Response, limit: Duration) -> BackendResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(e, limit))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend returned an error status");
            return Err(match serde_json::from_str::<FailureBody>(&body) {
                Ok(FailureBody {
                    success: false,
                    error,
                }) => BackendError::Rejected(
                    error.unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
                ),
                _ => BackendError::Http {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> BackendResult<T> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, self.request_timeout))?;
        self.read_body(response, self.request_timeout).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_inventory(&self) -> BackendResult<Vec<Product>> {
        let envelope: Envelope<Vec<InventoryRow>> = self.get(self.endpoint(&["inventory"])).await?;
        Ok(envelope.into_data()?.into_iter().map(Product::from).collect())
    }

    async fn fetch_product(&self, code: &str) -> BackendResult<Option<Product>> {
        let url = self.endpoint(&["product", code]);
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, self.request_timeout))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope: Envelope<ProductDto> = self.read_body(response, self.request_timeout).await?;
        Ok(Some(envelope.into_data()?.into()))
    }

    async fn submit_sale(&self, order: &SaleOrder) -> BackendResult<SaleConfirmation> {
        let url = self.endpoint(&["sale"]);
        debug!(%url, lines = order.lines.len(), "POST");
        let response = self
            .client
            .post(url)
            .timeout(self.sale_timeout)
            .json(&SaleRequest::from(order))
            .send()
            .await
            .map_err(|e| Self::transport_error(e, self.sale_timeout))?;

        let reply: SaleResponse = self.read_body(response, self.sale_timeout).await?;
        reply.into_confirmation()
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> BackendResult<Vec<SaleRecord>> {
        let mut url = self.endpoint(&["sales", "history"]);
        {
            let pairs = query.to_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let envelope: Envelope<Vec<HistoryRow>> = self.get(url).await?;
        Ok(envelope.into_data()?.into_iter().map(SaleRecord::from).collect())
    }

    async fn fetch_summary(&self, date: Option<&str>) -> BackendResult<DailySummary> {
        let mut url = self.endpoint(&["sales", "summary"]);
        if let Some(date) = date {
            url.query_pairs_mut().append_pair("date", date);
        }

        let envelope: Envelope<SummaryDto> = self.get(url).await?;
        envelope.into_data()?.into_summary()
    }

    async fn fetch_low_stock_alerts(&self) -> BackendResult<Vec<StockAlert>> {
        let response: AlertsResponse = self.get(self.endpoint(&["alerts"])).await?;
        response.into_alerts()
    }
}
