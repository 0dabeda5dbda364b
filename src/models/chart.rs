//! Chart data models consumed by the dashboard's Chart.js widgets

use serde::Serialize;

/// Labels with one value per label
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series<T> {
    pub labels: Vec<String>,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyPerformance {
    pub labels: Vec<String>,
    pub revenue: Vec<f64>,
    pub orders: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub revenue_trend: Series<f64>,
    pub order_types: Series<u32>,
    pub income_breakdown: Series<f64>,
    pub daily_performance: DailyPerformance,
}
