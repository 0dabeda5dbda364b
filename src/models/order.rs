//! Order command models

use serde::Serialize;

use super::analytics::Analytics;
use super::insight::Insight;
use super::record::FinancialRecord;

/// Input for adding an order, already validated as a number
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub total_order: f64,
    pub order_type: String,
    pub custom_date: Option<String>,
}

/// Result of adding an order
#[derive(Debug, Serialize)]
pub struct AddOrderResult {
    pub message: String,
    pub record: FinancialRecord,
    pub analytics: Analytics,
    pub insights: Vec<Insight>,
}

/// Result of deleting orders
#[derive(Debug, Serialize)]
pub struct DeleteOrdersResult {
    pub message: String,
    pub deleted: usize,
    pub analytics: Analytics,
    pub insights: Vec<Insight>,
}
