//! Transaction record models

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::utils::format::TIMESTAMP_FORMAT;

/// A freshly calculated order with all of its allocations
#[derive(Debug, Clone, Serialize)]
pub struct FinancialRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub total_order: f64,
    pub commission: f64,
    pub saldo_savings: f64,
    pub bbm_savings: f64,
    pub oli_savings: f64,
    pub net_income: f64,
    pub usable_income: f64,
    pub order_type: String,
    #[serde(serialize_with = "serialize_custom_date")]
    pub custom_date: Option<String>,
}

impl FinancialRecord {
    /// Ledger row in column order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.total_order.to_string(),
            self.commission.to_string(),
            self.saldo_savings.to_string(),
            self.bbm_savings.to_string(),
            self.oli_savings.to_string(),
            self.net_income.to_string(),
            self.usable_income.to_string(),
            self.order_type.clone(),
            self.custom_date.clone().unwrap_or_default(),
        ]
    }
}

/// A ledger row as read back from disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredTransaction {
    pub timestamp: String,
    pub total_order: f64,
    pub commission: f64,
    pub saldo_savings: f64,
    pub bbm_savings: f64,
    pub oli_savings: f64,
    pub net_income: f64,
    pub usable_income: f64,
    pub order_type: String,
    pub custom_date: String,
    /// Custom date when present, otherwise the timestamp's date
    pub display_date: String,
}

impl StoredTransaction {
    pub fn total_savings(&self) -> f64 {
        self.saldo_savings + self.bbm_savings + self.oli_savings
    }
}

fn serialize_timestamp<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
}

fn serialize_custom_date<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
