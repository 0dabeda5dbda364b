//! Data models for the finance tracker
//!
//! Records, analytics snapshots, advisor output and settings shared by the
//! services and HTTP handlers. Everything here serializes straight to the
//! JSON the dashboard consumes.

pub mod record;
pub mod analytics;
pub mod insight;
pub mod chart;
pub mod settings;
pub mod order;

// Re-export commonly used types for convenience
pub use record::{FinancialRecord, StoredTransaction};
pub use analytics::{Analytics, DailyStats, FinancialBreakdown, OrderTypeStats, Summary, TimeMetrics};
pub use insight::{Confidence, EarningsPrediction, Insight, InsightKind, Priority};
pub use chart::{ChartData, DailyPerformance, Series};
pub use settings::{PerformanceTargets, Settings};
pub use order::{AddOrderResult, DeleteOrdersResult, NewOrder};
