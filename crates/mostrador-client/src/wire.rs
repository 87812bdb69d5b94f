//! # Wire Format
//!
//! JSON shapes exchanged with the inventory backend and their conversion
//! into `mostrador-core` types.
//!
//! ## Message Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Backend JSON                                    │
//! │                                                                         │
//! │  GET  /inventory       {success, data: [{ID, Codigo, Nombre, Cantidad,  │
//! │                                          Precio, MinStock}]}            │
//! │  GET  /product/<code>  {success, data: {id, codigo, nombre, cantidad,   │
//! │                                         precio, minStock}}              │
//! │  POST /sale            → {cart: [{codigo, cantidad_vendida}], vendedor} │
//! │                        ← {success, sale_id, total, items,               │
//! │                           alerts: [{producto, cantidad_restante}]}      │
//! │                        ← {success: false, error}                        │
//! │  GET  /sales/history   {success, data: [{VentaID, Fecha, Hora, Codigo, │
//! │                                          Nombre, Cantidad, ...}]}       │
//! │  GET  /sales/summary   {success, data: {date, total_sales,              │
//! │                                         total_amount, items_sold,       │
//! │                                         sales?, error?}}                │
//! │  GET  /alerts          {success, alerts: [{codigo, nombre, cantidad,    │
//! │                                            minimo}]}                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend is a spreadsheet, so ids and codes may arrive as numbers and
//! prices as numbers or decimal strings. Field decoders below accept both.

use mostrador_core::{
    DailySummary, LowStockAlert, Money, OrderLine, Product, SaleConfirmation, SaleOrder,
    SaleRecord, StockAlert, DEFAULT_SELLER,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{BackendError, BackendResult};

// =============================================================================
// Envelopes
// =============================================================================

/// `{success, data, error}` wrapper used by most endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// The payload of a successful reply; `success: false` is a rejection.
    pub fn into_data(self) -> BackendResult<T> {
        if !self.success {
            return Err(rejection(self.error));
        }
        self.data
            .ok_or_else(|| BackendError::Malformed("success without data".to_string()))
    }
}

/// Body of a failed request, read when the status is not 2xx.
#[derive(Debug, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn rejection(error: Option<String>) -> BackendError {
    BackendError::Rejected(error.unwrap_or_else(|| "unspecified backend error".to_string()))
}

// =============================================================================
// Inventory
// =============================================================================

/// One row of `GET /inventory`.
#[derive(Debug, Deserialize)]
pub struct InventoryRow {
    #[serde(rename = "ID", deserialize_with = "de_text")]
    pub id: String,
    #[serde(rename = "Codigo", deserialize_with = "de_text")]
    pub code: String,
    #[serde(rename = "Nombre", deserialize_with = "de_text")]
    pub name: String,
    #[serde(rename = "Cantidad", deserialize_with = "de_count")]
    pub quantity: i64,
    #[serde(rename = "Precio", deserialize_with = "de_money")]
    pub price: Money,
    #[serde(rename = "MinStock", default, deserialize_with = "de_count")]
    pub min_stock: i64,
}

impl From<InventoryRow> for Product {
    fn from(row: InventoryRow) -> Self {
        Product::new(row.id, row.code, row.name, row.price, row.quantity, row.min_stock)
    }
}

/// `data` of `GET /product/<code>`.
#[derive(Debug, Deserialize)]
pub struct ProductDto {
    #[serde(deserialize_with = "de_text")]
    pub id: String,
    #[serde(rename = "codigo", deserialize_with = "de_text")]
    pub code: String,
    #[serde(rename = "nombre", deserialize_with = "de_text")]
    pub name: String,
    #[serde(rename = "cantidad", deserialize_with = "de_count")]
    pub quantity: i64,
    #[serde(rename = "precio", deserialize_with = "de_money")]
    pub price: Money,
    #[serde(rename = "minStock", default, deserialize_with = "de_count")]
    pub min_stock: i64,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Product::new(dto.id, dto.code, dto.name, dto.price, dto.quantity, dto.min_stock)
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SaleRequest {
    pub cart: Vec<SaleRequestLine>,
    pub vendedor: String,
}

#[derive(Debug, Serialize)]
pub struct SaleRequestLine {
    pub codigo: String,
    pub cantidad_vendida: i64,
}

impl From<&SaleOrder> for SaleRequest {
    fn from(order: &SaleOrder) -> Self {
        SaleRequest {
            cart: order
                .lines
                .iter()
                .map(|OrderLine { code, quantity }| SaleRequestLine {
                    codigo: code.clone(),
                    cantidad_vendida: *quantity,
                })
                .collect(),
            vendedor: order.seller.clone(),
        }
    }
}

/// Reply to `POST /sale`.
#[derive(Debug, Deserialize)]
pub struct SaleResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub sale_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_money")]
    pub total: Option<Money>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub items: Option<i64>,
    #[serde(default)]
    pub alerts: Vec<SaleAlertDto>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaleAlertDto {
    #[serde(deserialize_with = "de_text")]
    pub producto: String,
    #[serde(deserialize_with = "de_count")]
    pub cantidad_restante: i64,
}

impl SaleResponse {
    /// A committed sale, or why it was not.
    ///
    /// `success: true` without the sale id or total is malformed, never a commit.
    pub fn into_confirmation(self) -> BackendResult<SaleConfirmation> {
        if !self.success {
            return Err(rejection(self.error));
        }

        let sale_id = self
            .sale_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BackendError::Malformed("sale reply without sale_id".to_string()))?;
        let total = self
            .total
            .ok_or_else(|| BackendError::Malformed("sale reply without total".to_string()))?;

        Ok(SaleConfirmation {
            sale_id,
            total,
            item_count: self.items.unwrap_or(0),
            alerts: self
                .alerts
                .into_iter()
                .map(|a| LowStockAlert {
                    product: a.producto,
                    remaining_quantity: a.cantidad_restante,
                })
                .collect(),
        })
    }
}

// =============================================================================
// History & Summary
// =============================================================================

/// One flat row of `GET /sales/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryRow {
    #[serde(rename = "VentaID", deserialize_with = "de_text")]
    pub sale_id: String,
    #[serde(rename = "Fecha", deserialize_with = "de_text")]
    pub date: String,
    #[serde(rename = "Hora", deserialize_with = "de_text")]
    pub time: String,
    #[serde(rename = "ProductoID", default, deserialize_with = "de_opt_text")]
    pub product_id: Option<String>,
    #[serde(rename = "Codigo", deserialize_with = "de_text")]
    pub code: String,
    #[serde(rename = "Nombre", alias = "Producto", deserialize_with = "de_text")]
    pub name: String,
    #[serde(rename = "Cantidad", deserialize_with = "de_count")]
    pub quantity: i64,
    #[serde(rename = "PrecioUnitario", deserialize_with = "de_money")]
    pub unit_price: Money,
    #[serde(rename = "Subtotal", deserialize_with = "de_money")]
    pub subtotal: Money,
    #[serde(rename = "TotalVenta", deserialize_with = "de_money")]
    pub total: Money,
    #[serde(rename = "Vendedor", default = "default_seller", deserialize_with = "de_text")]
    pub seller: String,
}

fn default_seller() -> String {
    DEFAULT_SELLER.to_string()
}

impl From<HistoryRow> for SaleRecord {
    fn from(row: HistoryRow) -> Self {
        SaleRecord {
            sale_id: row.sale_id,
            date: row.date,
            time: row.time,
            product_id: row.product_id,
            product_code: row.code,
            product_name: row.name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
            seller: row.seller,
            transaction_total: row.total,
        }
    }
}

/// `data` of `GET /sales/summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryDto {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub total_sales: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_money")]
    pub total_amount: Option<Money>,
    #[serde(default, deserialize_with = "de_opt_count")]
    pub items_sold: Option<i64>,
    /// Absent on a day without sales.
    #[serde(default)]
    pub sales: Vec<HistoryRow>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SummaryDto {
    pub fn into_summary(self) -> BackendResult<DailySummary> {
        if let Some(error) = self.error {
            return Err(BackendError::Rejected(error));
        }

        let date = self
            .date
            .ok_or_else(|| BackendError::Malformed("summary without date".to_string()))?;

        Ok(DailySummary {
            date,
            total_amount: self.total_amount.unwrap_or_default(),
            total_sale_count: self.total_sales.unwrap_or(0),
            items_sold_count: self.items_sold.unwrap_or(0),
            sales: self.sales.into_iter().map(SaleRecord::from).collect(),
        })
    }
}

// =============================================================================
// Alerts
// =============================================================================

/// Reply to `GET /alerts`; the list lives under `alerts`, not `data`.
#[derive(Debug, Deserialize)]
pub struct AlertsResponse {
    pub success: bool,
    #[serde(default)]
    pub alerts: Vec<AlertDto>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertDto {
    #[serde(deserialize_with = "de_text")]
    pub codigo: String,
    #[serde(deserialize_with = "de_text")]
    pub nombre: String,
    #[serde(deserialize_with = "de_count")]
    pub cantidad: i64,
    #[serde(deserialize_with = "de_count")]
    pub minimo: i64,
}

impl AlertsResponse {
    pub fn into_alerts(self) -> BackendResult<Vec<StockAlert>> {
        if !self.success {
            return Err(rejection(self.error));
        }
        Ok(self
            .alerts
            .into_iter()
            .map(|a| StockAlert {
                code: a.codigo,
                name: a.nombre,
                quantity: a.cantidad,
                minimum: a.minimo,
            })
            .collect())
    }
}

// =============================================================================
// Field Decoders
// =============================================================================

fn text_from_value(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected text or number, got {}", other)),
    }
}

fn count_from_value(value: Value) -> Result<i64, String> {
    match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| format!("expected a whole number, got {}", n)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("expected a whole number, got {:?}", s)),
        other => Err(format!("expected a whole number, got {}", other)),
    }
}

fn money_from_value(value: Value) -> Result<Money, String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => return Err(format!("expected an amount, got {}", other)),
    };
    Money::parse_decimal(&text).map_err(|e| e.to_string())
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        value => text_from_value(value).map(Some).map_err(serde::de::Error::custom),
    }
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    count_from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn de_opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => count_from_value(value).map(Some).map_err(serde::de::Error::custom),
    }
}

fn de_money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    money_from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn de_opt_money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => money_from_value(value).map(Some).map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inventory_row_accepts_numbers_and_strings() {
        let rows: Envelope<Vec<InventoryRow>> = serde_json::from_value(json!({
            "success": true,
            "data": [
                {"ID": 1, "Codigo": "CAM001", "Nombre": "Camisa", "Cantidad": 5, "Precio": "10.00", "MinStock": 1},
                {"ID": "2", "Codigo": 1002, "Nombre": "Pan", "Cantidad": "0", "Precio": 3.5, "MinStock": 2}
            ]
        }))
        .unwrap();

        let products: Vec<Product> = rows.into_data().unwrap().into_iter().map(Product::from).collect();
        assert_eq!(products[0].id, "1");
        assert_eq!(products[0].unit_price, Money::from_cents(1000));
        assert_eq!(products[1].code, "1002");
        assert_eq!(products[1].quantity_on_hand, 0);
        assert_eq!(products[1].unit_price, Money::from_cents(350));
    }

    #[test]
    fn test_bad_price_is_an_error() {
        let result: Result<InventoryRow, _> = serde_json::from_value(json!(
            {"ID": 1, "Codigo": "A", "Nombre": "A", "Cantidad": 1, "Precio": "diez", "MinStock": 0}
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_failure_is_rejection() {
        let env: Envelope<Vec<InventoryRow>> =
            serde_json::from_value(json!({"success": false, "error": "sheet unavailable"})).unwrap();
        assert!(matches!(env.into_data(), Err(BackendError::Rejected(e)) if e == "sheet unavailable"));
    }

    #[test]
    fn test_sale_request_shape() {
        let order = SaleOrder {
            lines: vec![OrderLine { code: "CAM001".to_string(), quantity: 2 }],
            seller: "Ana".to_string(),
        };
        let body = serde_json::to_value(SaleRequest::from(&order)).unwrap();
        assert_eq!(
            body,
            json!({"cart": [{"codigo": "CAM001", "cantidad_vendida": 2}], "vendedor": "Ana"})
        );
    }

    #[test]
    fn test_sale_success_with_float_total() {
        let response: SaleResponse = serde_json::from_value(json!({
            "success": true,
            "sale_id": "VTA-20240501-1a2b3c4d",
            "total": 23.500000000000004,
            "items": 2,
            "alerts": [{"producto": "Pan", "cantidad_restante": 1}]
        }))
        .unwrap();

        let confirmation = response.into_confirmation().unwrap();
        assert_eq!(confirmation.total, Money::from_cents(2350));
        assert_eq!(confirmation.item_count, 2);
        assert_eq!(
            confirmation.alerts,
            vec![LowStockAlert { product: "Pan".to_string(), remaining_quantity: 1 }]
        );
    }

    #[test]
    fn test_sale_success_without_id_is_malformed() {
        let response: SaleResponse =
            serde_json::from_value(json!({"success": true, "total": 10})).unwrap();
        assert!(matches!(response.into_confirmation(), Err(BackendError::Malformed(_))));
    }

    #[test]
    fn test_sale_failure_is_rejection() {
        let response: SaleResponse =
            serde_json::from_value(json!({"success": false, "error": "stock insuficiente"})).unwrap();
        assert!(matches!(
            response.into_confirmation(),
            Err(BackendError::Rejected(e)) if e == "stock insuficiente"
        ));
    }

    #[test]
    fn test_history_row_defaults_seller() {
        let row: HistoryRow = serde_json::from_value(json!({
            "VentaID": "VTA-1", "Fecha": "2024-05-01", "Hora": "10:15:00",
            "ProductoID": 7, "Codigo": "CAM001", "Nombre": "Camisa",
            "Cantidad": 2, "PrecioUnitario": 10, "Subtotal": 20, "TotalVenta": 23.5
        }))
        .unwrap();

        let record = SaleRecord::from(row);
        assert_eq!(record.product_name, "Camisa");
        assert_eq!(record.seller, "Sistema");
        assert_eq!(record.product_id.as_deref(), Some("7"));
        assert_eq!(record.transaction_total, Money::from_cents(2350));
    }

    #[test]
    fn test_history_envelope_uses_sheet_columns() {
        let envelope: Envelope<Vec<HistoryRow>> = serde_json::from_value(json!({
            "success": true,
            "data": [{
                "VentaID": "VTA-1", "Fecha": "2024-05-01", "Hora": "10:15:00",
                "Codigo": "CAM001", "Nombre": "Camisa", "Cantidad": 2,
                "PrecioUnitario": 10, "Subtotal": 20, "TotalVenta": 20, "Vendedor": "Ana"
            }]
        }))
        .unwrap();

        let rows = envelope.into_data().unwrap();
        let record = SaleRecord::from(rows.into_iter().next().unwrap());
        assert_eq!(record.product_name, "Camisa");
        assert_eq!(record.product_code, "CAM001");
        assert!(record.product_id.is_none());
        assert_eq!(record.subtotal, Money::from_cents(2000));
    }

    #[test]
    fn test_history_row_accepts_producto_column() {
        let row: HistoryRow = serde_json::from_value(json!({
            "VentaID": "VTA-2", "Fecha": "2024-05-01", "Hora": "11:00:00",
            "Codigo": "PAN002", "Producto": "Pan", "Cantidad": 1,
            "PrecioUnitario": "3.50", "Subtotal": "3.50", "TotalVenta": "3.50"
        }))
        .unwrap();
        assert_eq!(row.name, "Pan");
    }

    #[test]
    fn test_summary_without_sales() {
        let dto: SummaryDto = serde_json::from_value(json!({
            "date": "2024-05-02", "total_sales": 0, "total_amount": 0,
            "items_sold": 0, "unique_sales": 0
        }))
        .unwrap();

        let summary = dto.into_summary().unwrap();
        assert_eq!(summary.date, "2024-05-02");
        assert!(summary.sales.is_empty());
        assert!(summary.total_amount.is_zero());
    }

    #[test]
    fn test_summary_with_error_key_fails() {
        let dto: SummaryDto = serde_json::from_value(json!({"error": "quota exceeded"})).unwrap();
        assert!(matches!(dto.into_summary(), Err(BackendError::Rejected(_))));
    }

    #[test]
    fn test_alerts_response() {
        let response: AlertsResponse = serde_json::from_value(json!({
            "success": true,
            "alerts": [{"codigo": "PAN001", "nombre": "Pan", "cantidad": 1, "minimo": 2}]
        }))
        .unwrap();
        let alerts = response.into_alerts().unwrap();
        assert_eq!(alerts[0].code, "PAN001");
        assert_eq!(alerts[0].minimum, 2);
    }
}
