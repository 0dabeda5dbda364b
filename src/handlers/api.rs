use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use super::{run_blocking, AppState};
use crate::db::ledger::DEFAULT_ORDER_TYPE;
use crate::models::NewOrder;
use crate::services::{analytics_service, chart_service, finance_service, settings_service};
use crate::utils::{json_response, local_now, AppError};

const CHART_WIDTH: u32 = 800;
const CHART_HEIGHT: u32 = 400;

pub async fn healthz_handler() -> &'static str {
    "ok"
}

pub async fn not_found_handler() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

/// Transactions plus a fresh analytics snapshot
pub async fn data_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let now = local_now();
    let (transactions, analytics) = run_blocking(&state, move |storage| {
        let transactions = finance_service::get_all_data(storage, now.date())?;
        let analytics = analytics_service::compute_analytics(&transactions, now);
        Ok((transactions, analytics))
    })
    .await?;

    Ok(json_response(
        StatusCode::OK,
        json!({
            "success": true,
            "transactions": transactions,
            "analytics": analytics,
            "insights": analytics.ai_analysis,
            "timestamp": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }),
    ))
}

pub async fn analytics_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let analytics = run_blocking(&state, |storage| {
        analytics_service::get_real_time_analytics(storage, local_now())
    })
    .await?;
    Ok(json_response(
        StatusCode::OK,
        json!({ "success": true, "analytics": analytics }),
    ))
}

pub async fn insights_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let analytics = run_blocking(&state, |storage| {
        analytics_service::get_real_time_analytics(storage, local_now())
    })
    .await?;
    Ok(json_response(
        StatusCode::OK,
        json!({ "success": true, "insights": analytics.ai_analysis }),
    ))
}

pub async fn config_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let settings = run_blocking(&state, settings_service::get_settings).await?;
    Ok(json_response(
        StatusCode::OK,
        json!({ "success": true, "config": settings }),
    ))
}

pub async fn revenue_chart_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let svg = run_blocking(&state, |storage| {
        let analytics = analytics_service::get_real_time_analytics(storage, local_now())?;
        chart_service::render_revenue_svg(&analytics.daily_analytics, CHART_WIDTH, CHART_HEIGHT)
    })
    .await?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

pub async fn add_order_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(payload)?;
    let total_order = parse_total_order(body.get("total_order"))?;
    let order = NewOrder {
        total_order,
        order_type: body
            .get("order_type")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ORDER_TYPE)
            .to_string(),
        custom_date: body
            .get("custom_date")
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    let result = run_blocking(&state, move |storage| {
        finance_service::add_order(storage, order, local_now())
    })
    .await?;

    Ok(json_response(
        StatusCode::OK,
        json!({
            "success": true,
            "message": result.message,
            "record": result.record,
            "analytics": result.analytics,
            "insights": result.insights,
            "ai_analysis": result.insights,
        }),
    ))
}

pub async fn delete_orders_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(payload)?;
    let indices = parse_indices(body.get("indices"))?;

    let result = run_blocking(&state, move |storage| {
        finance_service::delete_orders(storage, &indices, local_now())
    })
    .await?;

    Ok(json_response(
        StatusCode::OK,
        json!({
            "success": true,
            "message": result.message,
            "deleted": result.deleted,
            "analytics": result.analytics,
            "insights": result.insights,
            "ai_analysis": result.insights,
        }),
    ))
}

pub async fn update_config_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let patch = json_body(payload)?;

    let (settings, message) = run_blocking(&state, move |storage| {
        settings_service::update_settings(storage, &patch)
    })
    .await?;

    Ok(json_response(
        StatusCode::OK,
        json!({ "success": true, "message": message, "config": settings }),
    ))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            debug!("Rejected request body: {}", rejection.body_text());
            AppError::Validation(format!("❌ Invalid JSON body: {}", rejection.body_text()))
        })
}

/// Accept the amount as a JSON number or a numeric string
fn parse_total_order(value: Option<&Value>) -> Result<f64, AppError> {
    let invalid = || AppError::Validation("Total order must be a valid number".to_string());

    let amount = match value {
        None | Some(Value::Null) => {
            return Err(AppError::Validation("Total order is required".to_string()))
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(invalid())
    }
}

fn parse_indices(value: Option<&Value>) -> Result<Vec<usize>, AppError> {
    let items = match value {
        None | Some(Value::Null) => return Err(AppError::Validation("No indices provided".to_string())),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(AppError::Validation("Indices must be a list of row numbers".to_string()))
        }
    };

    if items.is_empty() {
        return Err(AppError::Validation("No indices provided".to_string()));
    }

    items
        .iter()
        .map(|item| {
            item.as_u64()
                .map(|i| i as usize)
                .ok_or_else(|| AppError::Validation("Indices must be a list of row numbers".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_accepts_numbers_and_strings() {
        assert_eq!(parse_total_order(Some(&json!(25000))).expect("int"), 25000.0);
        assert_eq!(parse_total_order(Some(&json!(1500.5))).expect("float"), 1500.5);
        assert_eq!(parse_total_order(Some(&json!(" 12000 "))).expect("string"), 12000.0);
    }

    #[test]
    fn total_order_errors() {
        let message = |v: Option<&Value>| parse_total_order(v).unwrap_err().to_string();
        assert_eq!(message(None), "Total order is required");
        assert_eq!(message(Some(&Value::Null)), "Total order is required");
        assert_eq!(message(Some(&json!("dua puluh"))), "Total order must be a valid number");
        assert_eq!(message(Some(&json!("NaN"))), "Total order must be a valid number");
        assert_eq!(message(Some(&json!([1]))), "Total order must be a valid number");
    }

    #[test]
    fn indices_parsing() {
        assert_eq!(parse_indices(Some(&json!([0, 3]))).expect("indices"), vec![0, 3]);
        assert_eq!(
            parse_indices(Some(&json!([]))).unwrap_err().to_string(),
            "No indices provided"
        );
        assert_eq!(parse_indices(None).unwrap_err().to_string(), "No indices provided");
        assert!(parse_indices(Some(&json!([-1]))).is_err());
        assert!(parse_indices(Some(&json!("0"))).is_err());
    }
}
