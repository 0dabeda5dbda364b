pub mod table;
pub mod page;
pub mod errors;
pub mod format;

pub use table::Table;
pub use page::Page;
pub use errors::{AppError, LedgerError};
pub use format::{format_amount, format_percentage, format_rupiah};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, NaiveDateTime};

/// Build a JSON response that browsers on other origins may read
pub fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(body),
    )
        .into_response()
}

/// Current wall-clock time in the server's local timezone
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
