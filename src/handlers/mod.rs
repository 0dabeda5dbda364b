use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::db::Storage;
use crate::utils::AppError;

pub mod api;
pub mod pages;
pub mod request_tracing;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        AppState {
            storage: Arc::new(storage),
        }
    }
}

/// Run file I/O and rendering on the blocking pool
pub(crate) async fn run_blocking<T, F>(state: &AppState, work: F) -> Result<T, AppError>
where
    F: FnOnce(&Storage) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let storage = Arc::clone(&state.storage);
    tokio::task::spawn_blocking(move || work(&storage))
        .await
        .map_err(|e| AppError::Internal(format!("Storage task failed: {}", e)))?
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::dashboard_page))
        .route("/dashboard", get(pages::dashboard_page))
        .route("/orders", get(pages::orders_page))
        .route("/history", get(pages::history_page))
        .route("/targets", get(pages::targets_page))
        .route("/healthz", get(api::healthz_handler))
        .route("/api/data", get(api::data_handler))
        .route("/api/analytics", get(api::analytics_handler))
        .route("/api/insights", get(api::insights_handler))
        .route("/api/config", get(api::config_handler))
        .route("/api/chart/revenue.svg", get(api::revenue_chart_handler))
        .route("/api/add-order", post(api::add_order_handler))
        .route("/api/delete-orders", post(api::delete_orders_handler))
        .route("/api/update-config", post(api::update_config_handler))
        .fallback(api::not_found_handler)
        .layer(middleware::from_fn(request_tracing::request_tracing_middleware))
        .with_state(state)
}
