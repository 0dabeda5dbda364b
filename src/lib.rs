//! Delivery-rider finance tracker
//!
//! Splits every order into commission, savings buckets and income, keeps the
//! orders in a CSV ledger and serves a dashboard with analytics over HTTP.

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::{init_storage, Storage};
pub use handlers::{build_router, AppState};
