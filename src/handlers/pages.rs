use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use super::{run_blocking, AppState};
use crate::db::Storage;
use crate::models::StoredTransaction;
use crate::services::{analytics_service, finance_service, settings_service};
use crate::utils::format::DATE_FORMAT;
use crate::utils::table::escape_html;
use crate::utils::{format_percentage, format_rupiah, local_now, AppError, Page, Table};

const LAYOUT: &str = include_str!("../../assets/layout.html");
const COMMON_JS: &str = include_str!("../../assets/common.js");
const DASHBOARD: &str = include_str!("../../assets/dashboard.html");
const ORDERS: &str = include_str!("../../assets/orders.html");
const HISTORY: &str = include_str!("../../assets/history.html");
const TARGETS: &str = include_str!("../../assets/targets.html");

pub const HISTORY_PAGE_SIZE: usize = 20;

const NAV_ACTIVE: &str = "nav-active text-white shadow-lg";
const NAV_IDLE: &str = "text-gray-600 hover:text-purple-600 hover:bg-gray-100";
const NAV_PAGES: [&str; 4] = ["dashboard", "orders", "history", "targets"];

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    page: Option<String>,
}

pub async fn dashboard_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = run_blocking(&state, |storage| {
        let settings = settings_service::get_settings(storage)?;
        let target = settings.performance_metrics.target_daily_income.to_string();
        let content = fill(DASHBOARD, &HashMap::from([("target_daily_income", target.as_str())]));
        Ok(layout(&settings.company_name, "AI Finance Dashboard", "dashboard", &content))
    })
    .await?;
    Ok(Html(html))
}

pub async fn orders_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let settings = run_blocking(&state, settings_service::get_settings).await?;
    let today = local_now().format(DATE_FORMAT).to_string();
    let rates = [
        finance_service::COMMISSION_RATE.to_string(),
        finance_service::SALDO_SAVINGS_RATE.to_string(),
        finance_service::BBM_SAVINGS_RATE.to_string(),
        finance_service::OLI_SAVINGS_RATE.to_string(),
    ];
    let content = fill(
        ORDERS,
        &HashMap::from([
            ("today", today.as_str()),
            ("commission_rate", rates[0].as_str()),
            ("saldo_rate", rates[1].as_str()),
            ("bbm_rate", rates[2].as_str()),
            ("oli_rate", rates[3].as_str()),
        ]),
    );
    Ok(Html(layout(&settings.company_name, "Add New Order", "orders", &content)))
}

/// Server-rendered history, newest first. Checkbox values are ledger positions.
pub async fn history_page(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Html<String>, AppError> {
    let page_number = match query.page.as_deref().map(str::trim) {
        None | Some("") => 1,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| AppError::Validation("❌ Invalid page number".to_string()))?,
    };

    let html = run_blocking(&state, move |storage| render_history(storage, page_number)).await?;
    Ok(Html(html))
}

pub async fn targets_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let settings = run_blocking(&state, settings_service::get_settings).await?;
    let pct = |rate: f64| format_percentage(rate * 100.0);
    let rates = [
        pct(finance_service::COMMISSION_RATE),
        pct(finance_service::SALDO_SAVINGS_RATE),
        pct(finance_service::BBM_SAVINGS_RATE),
        pct(finance_service::OLI_SAVINGS_RATE),
    ];
    let content = fill(
        TARGETS,
        &HashMap::from([
            ("commission_pct", rates[0].as_str()),
            ("saldo_pct", rates[1].as_str()),
            ("bbm_pct", rates[2].as_str()),
            ("oli_pct", rates[3].as_str()),
        ]),
    );
    Ok(Html(layout(&settings.company_name, "Performance Targets", "targets", &content)))
}

fn render_history(storage: &Storage, page_number: usize) -> Result<String, AppError> {
    let settings = settings_service::get_settings(storage)?;
    let now = local_now();
    let transactions = finance_service::get_all_data(storage, now.date())?;
    let summary = analytics_service::compute_analytics(&transactions, now).summary;

    let rows = newest_first(&transactions);
    let page = Page::new(&rows, HISTORY_PAGE_SIZE, page_number)?;

    let total_orders = summary.total_orders.to_string();
    let total_revenue = format_rupiah(summary.total_revenue);
    let total_net_income = format_rupiah(summary.total_net_income);
    let avg_order_value = format_rupiah(summary.avg_order_value);
    let table = history_table(page.items());
    let pagination = pagination(&page);

    let content = fill(
        HISTORY,
        &HashMap::from([
            ("total_orders", total_orders.as_str()),
            ("total_revenue", total_revenue.as_str()),
            ("total_net_income", total_net_income.as_str()),
            ("avg_order_value", avg_order_value.as_str()),
            ("table", table.as_str()),
            ("pagination", pagination.as_str()),
        ]),
    );
    Ok(layout(&settings.company_name, "Transaction History", "history", &content))
}

/// Pair each transaction with its ledger position, newest first
fn newest_first(transactions: &[StoredTransaction]) -> Vec<(usize, &StoredTransaction)> {
    let mut rows: Vec<(usize, &StoredTransaction)> = transactions.iter().enumerate().collect();
    rows.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp).then(b.0.cmp(&a.0)));
    rows
}

fn history_table(rows: &[(usize, &StoredTransaction)]) -> String {
    if rows.is_empty() {
        return "<div class=\"text-center py-12\">\
                <h3 class=\"text-lg font-semibold text-gray-500\">Belum ada transaksi</h3>\
                <p class=\"text-gray-400 mt-2\">Mulai dengan menambahkan order pertama Anda</p>\
                </div>"
            .to_string();
    }

    let mut table = Table::new(vec![
        "Tanggal",
        "Jenis",
        "Total Order",
        "Komisi",
        "Pendapatan Bersih",
        "Siap Pakai",
    ])
    .with_selection();

    for (index, tx) in rows {
        table.add_row(
            Some(*index),
            vec![
                tx.display_date.clone(),
                tx.order_type.clone(),
                format_rupiah(tx.total_order),
                format!("-{}", format_rupiah(tx.commission)),
                format_rupiah(tx.net_income),
                format_rupiah(tx.usable_income),
            ],
        );
    }
    table.render()
}

fn pagination<T>(page: &Page<'_, T>) -> String {
    let mut html = String::new();
    if !page.is_first() {
        html.push_str(&format!(
            "<a href=\"/history?page={}\" class=\"px-3 py-1 bg-gray-100 rounded-lg\">&laquo; Prev</a>",
            page.current_page() - 1
        ));
    }
    html.push_str(&format!(
        "<span>Halaman {} dari {} ({} transaksi)</span>",
        page.current_page(),
        page.total_pages(),
        page.total_items()
    ));
    if !page.is_last() {
        html.push_str(&format!(
            "<a href=\"/history?page={}\" class=\"px-3 py-1 bg-gray-100 rounded-lg\">Next &raquo;</a>",
            page.current_page() + 1
        ));
    }
    html
}

fn layout(company_name: &str, title: &str, active: &str, content: &str) -> String {
    let company_name = escape_html(company_name);
    let nav_keys = NAV_PAGES.map(|name| format!("nav_{}", name));
    let mut vars = HashMap::from([
        ("title", title),
        ("company_name", company_name.as_str()),
        ("common_js", COMMON_JS),
        ("content", content),
    ]);
    for (key, name) in nav_keys.iter().zip(NAV_PAGES) {
        vars.insert(key.as_str(), if name == active { NAV_ACTIVE } else { NAV_IDLE });
    }
    fill(LAYOUT, &vars)
}

/// Replace `{{name}}` placeholders in a single pass; unknown names are left as-is
fn fill(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match vars.get(name) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push_str("{{");
                        output.push_str(name);
                        output.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}
