use serde_json::Value;
use tracing::info;

use crate::db::{self, Storage};
use crate::models::Settings;
use crate::utils::AppError;

const PERFORMANCE_METRICS: &str = "performance_metrics";

pub fn get_settings(storage: &Storage) -> Result<Settings, AppError> {
    Ok(db::settings::load_settings(storage)?)
}

/// Apply `patch` to the stored settings and persist the result
pub fn update_settings(storage: &Storage, patch: &Value) -> Result<(Settings, String), AppError> {
    let _guard = storage.write_guard();
    let current = db::settings::read_settings(storage).unwrap_or_default();
    let merged = merge_settings(&current, patch)?;
    validate_settings(&merged)?;

    db::settings::save_settings(storage, &merged)?;
    info!("⚙️ Settings updated for {}", merged.company_name);

    Ok((merged, "✅ Konfigurasi berhasil diperbarui!".to_string()))
}

/// Merge a JSON patch into `current`.
///
/// `performance_metrics` is merged key by key; every other key replaces the
/// stored value.
pub fn merge_settings(current: &Settings, patch: &Value) -> Result<Settings, AppError> {
    let Some(patch) = patch.as_object() else {
        return Err(AppError::Validation("❌ Configuration must be a JSON object".to_string()));
    };

    let mut merged = serde_json::to_value(current)
        .map_err(|e| AppError::Internal(format!("Failed to encode settings: {}", e)))?;
    let Some(target) = merged.as_object_mut() else {
        return Err(AppError::Internal("Settings did not encode as an object".to_string()));
    };

    for (key, value) in patch {
        match (key.as_str(), value, target.get_mut(key)) {
            (PERFORMANCE_METRICS, Value::Object(metrics), Some(Value::Object(existing))) => {
                for (metric, metric_value) in metrics {
                    existing.insert(metric.clone(), metric_value.clone());
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    serde_json::from_value(merged)
        .map_err(|e| AppError::Validation(format!("❌ Invalid configuration: {}", e)))
}

fn validate_settings(settings: &Settings) -> Result<(), AppError> {
    let metrics = &settings.performance_metrics;
    if settings.company_name.trim().is_empty() {
        return Err(AppError::Validation("company_name must not be empty".to_string()));
    }
    if !(0.0..=100.0).contains(&settings.tax_rate) {
        return Err(AppError::Validation("tax_rate must be between 0 and 100".to_string()));
    }
    if !metrics.target_daily_income.is_finite() || metrics.target_daily_income < 0.0 {
        return Err(AppError::Validation("target_daily_income must be >= 0".to_string()));
    }
    if !(0.0..=100.0).contains(&metrics.efficiency_threshold) {
        return Err(AppError::Validation(
            "efficiency_threshold must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}
