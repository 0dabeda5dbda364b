use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::db::{self, Storage};
use crate::models::{
    AddOrderResult, DeleteOrdersResult, FinancialRecord, NewOrder, StoredTransaction,
};
use crate::services::analytics_service;
use crate::utils::format::{parse_date, DATE_FORMAT};
use crate::utils::{format_amount, format_rupiah, AppError};

pub const COMMISSION_RATE: f64 = 0.15;
pub const SALDO_SAVINGS_RATE: f64 = 0.10;
pub const BBM_SAVINGS_RATE: f64 = 0.10;
pub const OLI_SAVINGS_RATE: f64 = 0.10;

/// Smallest order the tracker accepts, in Rupiah
pub const MIN_ORDER_AMOUNT: f64 = 1000.0;

/// Split an order into commission, savings buckets and income
pub fn calculate_finances(
    total_order: f64,
    order_type: &str,
    custom_date: Option<String>,
    now: NaiveDateTime,
) -> FinancialRecord {
    let commission = total_order * COMMISSION_RATE;
    let saldo_savings = total_order * SALDO_SAVINGS_RATE;
    let bbm_savings = total_order * BBM_SAVINGS_RATE;
    let oli_savings = total_order * OLI_SAVINGS_RATE;
    let net_income = total_order - commission;
    let usable_income = net_income - (saldo_savings + bbm_savings + oli_savings);

    FinancialRecord {
        timestamp: now,
        total_order,
        commission,
        saldo_savings,
        bbm_savings,
        oli_savings,
        net_income,
        usable_income,
        order_type: order_type.to_string(),
        custom_date,
    }
}

/// Validate, record and append a new order, returning fresh analytics
pub fn add_order(
    storage: &Storage,
    order: NewOrder,
    now: NaiveDateTime,
) -> Result<AddOrderResult, AppError> {
    if !order.total_order.is_finite() || order.total_order < MIN_ORDER_AMOUNT {
        return Err(AppError::Validation("Total order minimal Rp 1,000".to_string()));
    }

    // Stored zero-padded so it matches timestamp dates in the daily rollup
    let custom_date = match order.custom_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(date) => Some(
            parse_date(date)
                .ok_or_else(|| {
                    AppError::Validation(
                        "❌ Format tanggal tidak valid. Gunakan format YYYY-MM-DD".to_string(),
                    )
                })?
                .format(DATE_FORMAT)
                .to_string(),
        ),
    };

    let order_type = match order.order_type.trim() {
        "" => db::ledger::DEFAULT_ORDER_TYPE,
        other => other,
    };

    let record = calculate_finances(order.total_order, order_type, custom_date, now);
    {
        let _guard = storage.write_guard();
        db::ledger::append_record(storage, &record)?;
    }
    info!(
        "✅ Recorded {} order of {} (usable {})",
        record.order_type,
        format_rupiah(record.total_order),
        format_rupiah(record.usable_income)
    );

    let analytics = analytics_service::get_real_time_analytics(storage, now)?;
    let insights = analytics.ai_analysis.clone();

    Ok(AddOrderResult {
        message: format!(
            "✅ Order {} sebesar Rp {} berhasil ditambahkan!",
            record.order_type,
            format_amount(record.total_order)
        ),
        record,
        analytics,
        insights,
    })
}

/// Delete the orders at the given `load_all` positions
pub fn delete_orders(
    storage: &Storage,
    indices: &[usize],
    now: NaiveDateTime,
) -> Result<DeleteOrdersResult, AppError> {
    let deleted = {
        let _guard = storage.write_guard();
        db::ledger::delete_records(storage, indices)?
    };
    if deleted == 0 {
        debug!("Nothing deleted for indices {:?}", indices);
        return Err(AppError::Validation("Gagal menghapus data".to_string()));
    }
    info!("🗑️ Deleted {} ledger row(s)", deleted);

    let analytics = analytics_service::get_real_time_analytics(storage, now)?;
    let insights = analytics.ai_analysis.clone();

    Ok(DeleteOrdersResult {
        message: format!("🗑️ Berhasil menghapus {} data transaksi", deleted),
        deleted,
        analytics,
        insights,
    })
}

pub fn get_all_data(storage: &Storage, today: NaiveDate) -> Result<Vec<StoredTransaction>, AppError> {
    Ok(db::ledger::load_all(storage, today)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics_service::tests::at;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, Storage) {
        let dir = tempdir().expect("tempdir");
        let storage = Storage::new(dir.path());
        db::init_storage(&storage).expect("init");
        (dir, storage)
    }

    fn order(total: f64, order_type: &str, custom_date: Option<&str>) -> NewOrder {
        NewOrder {
            total_order: total,
            order_type: order_type.to_string(),
            custom_date: custom_date.map(str::to_string),
        }
    }

    #[test]
    fn allocations_balance() {
        let record = calculate_finances(25000.0, "Food", None, at("2025-05-10", 9));
        assert!((record.commission - 3750.0).abs() < 1e-6);
        assert!((record.saldo_savings - 2500.0).abs() < 1e-6);
        assert!((record.bbm_savings - 2500.0).abs() < 1e-6);
        assert!((record.oli_savings - 2500.0).abs() < 1e-6);
        assert!((record.net_income - 21250.0).abs() < 1e-6);
        assert!((record.usable_income - 13750.0).abs() < 1e-6);
        assert!((record.net_income + record.commission - record.total_order).abs() < 1e-6);
        let savings = record.saldo_savings + record.bbm_savings + record.oli_savings;
        assert!((record.usable_income + savings - record.net_income).abs() < 1e-6);
    }

    #[test]
    fn add_order_appends_and_reports() {
        let (_dir, storage) = setup();
        let now = at("2025-05-10", 9);

        let result = add_order(&storage, order(25000.0, "Food", None), now).expect("add");
        assert_eq!(result.message, "✅ Order Food sebesar Rp 25,000 berhasil ditambahkan!");
        assert_eq!(result.analytics.summary.total_orders, 1);
        assert_eq!(result.analytics.time_metrics.today_orders, 1);

        let data = get_all_data(&storage, now.date()).expect("load");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].timestamp, "2025-05-10 09:00:00");
        assert_eq!(data[0].display_date, "2025-05-10");
    }

    #[test]
    fn add_order_rejects_small_amounts() {
        let (_dir, storage) = setup();
        let err = add_order(&storage, order(999.0, "Food", None), at("2025-05-10", 9)).unwrap_err();
        assert_eq!(err.to_string(), "Total order minimal Rp 1,000");

        let err = add_order(&storage, order(f64::NAN, "Food", None), at("2025-05-10", 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(get_all_data(&storage, at("2025-05-10", 9).date()).expect("load").is_empty());
    }

    #[test]
    fn add_order_validates_custom_date() {
        let (_dir, storage) = setup();
        let now = at("2025-05-10", 9);

        let err = add_order(&storage, order(5000.0, "Food", Some("10/05/2025")), now).unwrap_err();
        assert_eq!(err.to_string(), "❌ Format tanggal tidak valid. Gunakan format YYYY-MM-DD");

        add_order(&storage, order(5000.0, "Food", Some("2025-05-01")), now).expect("add dated");
        add_order(&storage, order(5000.0, "Food", Some("  ")), now).expect("add blank date");

        let data = get_all_data(&storage, now.date()).expect("load");
        assert_eq!(data[0].display_date, "2025-05-01");
        assert_eq!(data[1].custom_date, "");
        assert_eq!(data[1].display_date, "2025-05-10");
    }

    #[test]
    fn blank_order_type_becomes_regular() {
        let (_dir, storage) = setup();
        let result = add_order(&storage, order(5000.0, "  ", None), at("2025-05-10", 9)).expect("add");
        assert_eq!(result.record.order_type, "Regular");
    }

    #[test]
    fn delete_orders_removes_rows() {
        let (_dir, storage) = setup();
        let now = at("2025-05-10", 9);
        for total in [5000.0, 6000.0, 7000.0] {
            add_order(&storage, order(total, "Food", None), now).expect("add");
        }

        let result = delete_orders(&storage, &[0, 2, 2, 99], now).expect("delete");
        assert_eq!(result.deleted, 2);
        assert_eq!(result.message, "🗑️ Berhasil menghapus 2 data transaksi");
        assert_eq!(result.analytics.summary.total_orders, 1);

        let data = get_all_data(&storage, now.date()).expect("load");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].total_order, 6000.0);
    }

    #[test]
    fn delete_orders_fails_when_nothing_matches() {
        let (_dir, storage) = setup();
        let err = delete_orders(&storage, &[0], at("2025-05-10", 9)).unwrap_err();
        assert_eq!(err.to_string(), "Gagal menghapus data");
    }

    #[test]
    fn custom_date_is_stored_zero_padded() {
        let (_dir, storage) = setup();
        let now = at("2025-05-10", 9);

        let result = add_order(&storage, order(5000.0, "Food", Some("2025-5-1")), now).expect("add");
        assert_eq!(result.record.custom_date.as_deref(), Some("2025-05-01"));

        let data = get_all_data(&storage, now.date()).expect("load");
        assert_eq!(data[0].custom_date, "2025-05-01");
        assert!(result.analytics.daily_analytics.contains_key("2025-05-01"));
    }
}
