//! # Backend Abstraction
//!
//! The register talks to the inventory backend only through [`Backend`].
//! [`crate::http::HttpBackend`] is the production implementation; tests use
//! in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use mostrador_core::validation::{validate_date_range, validate_history_limit};
use mostrador_core::{DailySummary, Product, SaleConfirmation, SaleOrder, SaleRecord, StockAlert, ValidationError};

use crate::error::BackendResult;

/// Filters for `GET /sales/history`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Most recent rows to return.
    pub limit: Option<u32>,
    /// Inclusive `YYYY-MM-DD` lower bound.
    pub date_from: Option<String>,
    /// Inclusive `YYYY-MM-DD` upper bound.
    pub date_to: Option<String>,
}

impl HistoryQuery {
    pub fn with_limit(limit: u32) -> Self {
        HistoryQuery {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(limit) = self.limit {
            validate_history_limit(limit)?;
        }
        validate_date_range(self.date_from.as_deref(), self.date_to.as_deref())
    }

    /// Query-string pairs, omitting unset filters.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(from) = &self.date_from {
            pairs.push(("date_from", from.clone()));
        }
        if let Some(to) = &self.date_to {
            pairs.push(("date_to", to.clone()));
        }
        pairs
    }
}

/// Everything the register needs from the backend.
///
/// ## Contract
/// - `submit_sale` either commits every line or none
/// - A reply with `success: false` is `BackendError::Rejected`, never data
#[async_trait]
pub trait Backend: Send + Sync {
    /// Full product list, in backend order.
    async fn fetch_inventory(&self) -> BackendResult<Vec<Product>>;

    /// One product by code; `Ok(None)` when the backend does not know it.
    async fn fetch_product(&self, code: &str) -> BackendResult<Option<Product>>;

    async fn submit_sale(&self, order: &SaleOrder) -> BackendResult<SaleConfirmation>;

    async fn fetch_history(&self, query: &HistoryQuery) -> BackendResult<Vec<SaleRecord>>;

    /// Summary for `date`, or for the backend's today when `None`.
    async fn fetch_summary(&self, date: Option<&str>) -> BackendResult<DailySummary>;

    /// Products the backend considers low on stock.
    async fn fetch_low_stock_alerts(&self) -> BackendResult<Vec<StockAlert>>;
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn fetch_inventory(&self) -> BackendResult<Vec<Product>> {
        (**self).fetch_inventory().await
    }

    async fn fetch_product(&self, code: &str) -> BackendResult<Option<Product>> {
        (**self).fetch_product(code).await
    }

    async fn submit_sale(&self, order: &SaleOrder) -> BackendResult<SaleConfirmation> {
        (**self).submit_sale(order).await
    }

    async fn fetch_history(&self, query: &HistoryQuery) -> BackendResult<Vec<SaleRecord>> {
        (**self).fetch_history(query).await
    }

    async fn fetch_summary(&self, date: Option<&str>) -> BackendResult<DailySummary> {
        (**self).fetch_summary(date).await
    }

    async fn fetch_low_stock_alerts(&self) -> BackendResult<Vec<StockAlert>> {
        (**self).fetch_low_stock_alerts().await
    }
}
