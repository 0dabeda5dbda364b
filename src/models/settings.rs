//! User settings persisted in `config.json`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceTargets {
    pub target_daily_income: f64,
    pub target_weekly_orders: u32,
    pub efficiency_threshold: f64,
    /// Extra metrics written by clients are kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PerformanceTargets {
    fn default() -> Self {
        PerformanceTargets {
            target_daily_income: 200_000.0,
            target_weekly_orders: 20,
            efficiency_threshold: 50.0,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub company_name: String,
    pub tax_rate: f64,
    pub currency: String,
    pub performance_metrics: PerformanceTargets,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            company_name: "Maxim Finance AI".to_string(),
            tax_rate: 0.0,
            currency: "IDR".to_string(),
            performance_metrics: PerformanceTargets::default(),
            extra: Map::new(),
        }
    }
}
