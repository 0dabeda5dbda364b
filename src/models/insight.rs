//! Advisor models

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
}

/// Ordering follows display order: high first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single heuristic observation about recent performance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
}

impl Insight {
    pub fn new(kind: InsightKind, icon: &str, title: &str, message: String, priority: Priority) -> Self {
        Insight {
            kind,
            icon: icon.to_string(),
            title: title.to_string(),
            message,
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Linear projection of upcoming revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsPrediction {
    pub prediction: f64,
    pub confidence: Confidence,
    pub daily_average: f64,
}

impl Default for EarningsPrediction {
    fn default() -> Self {
        EarningsPrediction {
            prediction: 0.0,
            confidence: Confidence::Low,
            daily_average: 0.0,
        }
    }
}
