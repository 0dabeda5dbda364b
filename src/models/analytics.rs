//! Aggregated analytics models

use std::collections::BTreeMap;

use serde::Serialize;

use super::chart::ChartData;
use super::insight::{EarningsPrediction, Insight};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_orders: u32,
    pub total_revenue: f64,
    pub total_net_income: f64,
    pub total_usable_income: f64,
    pub avg_order_value: f64,
    /// Usable income as a percentage of revenue
    pub efficiency_ratio: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeMetrics {
    pub today_orders: u32,
    pub today_revenue: f64,
    pub weekly_orders: u32,
    pub weekly_revenue: f64,
}

/// Per display-date rollup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyStats {
    pub revenue: f64,
    pub orders: u32,
    /// Sum of usable income
    pub income: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderTypeStats {
    pub count: u32,
    pub revenue: f64,
    pub avg_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialBreakdown {
    #[serde(rename = "Komisi Maxim")]
    pub commission: f64,
    #[serde(rename = "Tabungan Saldo")]
    pub saldo_savings: f64,
    #[serde(rename = "Tabungan BBM")]
    pub bbm_savings: f64,
    #[serde(rename = "Tabungan Oli")]
    pub oli_savings: f64,
    #[serde(rename = "Pendapatan Bersih")]
    pub net_income: f64,
    #[serde(rename = "Pendapatan Siap Pakai")]
    pub usable_income: f64,
}

/// Everything the dashboard shows, recomputed from the full ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub summary: Summary,
    pub time_metrics: TimeMetrics,
    /// Keyed by `YYYY-MM-DD`, so iteration is in date order
    pub daily_analytics: BTreeMap<String, DailyStats>,
    pub order_analytics: BTreeMap<String, OrderTypeStats>,
    pub financial_breakdown: FinancialBreakdown,
    pub ai_analysis: Vec<Insight>,
    pub financial_tips: Vec<String>,
    pub earnings_prediction: EarningsPrediction,
    pub chart_data: ChartData,
}
