use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::db::{self, Storage};
use crate::models::{
    Analytics, DailyStats, FinancialBreakdown, OrderTypeStats, StoredTransaction, Summary,
    TimeMetrics,
};
use crate::services::{advisor_service, chart_service};
use crate::utils::format::{parse_date, DATE_FORMAT};
use crate::utils::AppError;

/// Days (inclusive of today) that count towards the weekly metrics
const WEEK_WINDOW_DAYS: i64 = 7;

/// Reload the ledger and recompute every aggregate
pub fn get_real_time_analytics(storage: &Storage, now: NaiveDateTime) -> Result<Analytics, AppError> {
    let data = db::ledger::load_all(storage, now.date())?;
    Ok(compute_analytics(&data, now))
}

/// Compute the full analytics snapshot for `data` as seen at `now`
pub fn compute_analytics(data: &[StoredTransaction], now: NaiveDateTime) -> Analytics {
    if data.is_empty() {
        return Analytics::default();
    }

    let mut analytics = Analytics {
        summary: summarize(data),
        time_metrics: time_metrics(data, now.date()),
        daily_analytics: daily_rollup(data),
        order_analytics: order_type_rollup(data),
        financial_breakdown: financial_breakdown(data),
        ..Analytics::default()
    };

    analytics.ai_analysis = advisor_service::analyze_performance(&analytics, now.hour());
    analytics.financial_tips = advisor_service::generate_financial_tips(&analytics.summary, now.hour());
    analytics.earnings_prediction =
        advisor_service::predict_earnings(&analytics.daily_analytics, advisor_service::PREDICTION_DAYS);
    analytics.chart_data = chart_service::generate_chart_data(data, &analytics.daily_analytics);

    analytics
}

fn summarize(data: &[StoredTransaction]) -> Summary {
    let total_orders = data.len() as u32;
    let total_revenue: f64 = data.iter().map(|t| t.total_order).sum();
    let total_net_income: f64 = data.iter().map(|t| t.net_income).sum();
    let total_usable_income: f64 = data.iter().map(|t| t.usable_income).sum();

    let efficiency_ratio = if total_revenue > 0.0 {
        total_usable_income / total_revenue * 100.0
    } else {
        0.0
    };
    let avg_order_value = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    Summary {
        total_orders,
        total_revenue,
        total_net_income,
        total_usable_income,
        avg_order_value,
        efficiency_ratio,
        performance_score: (efficiency_ratio * 1.5).min(100.0),
    }
}

fn time_metrics(data: &[StoredTransaction], today: NaiveDate) -> TimeMetrics {
    let today_str = today.format(DATE_FORMAT).to_string();
    let mut metrics = TimeMetrics::default();

    for tx in data {
        if tx.display_date == today_str {
            metrics.today_orders += 1;
            metrics.today_revenue += tx.total_order;
        }

        // Future-dated rows count as this week
        let in_week = parse_date(&tx.display_date)
            .map(|date| (today - date).num_days() <= WEEK_WINDOW_DAYS)
            .unwrap_or(false);
        if in_week {
            metrics.weekly_orders += 1;
            metrics.weekly_revenue += tx.total_order;
        }
    }

    metrics
}

fn daily_rollup(data: &[StoredTransaction]) -> BTreeMap<String, DailyStats> {
    let mut daily: BTreeMap<String, DailyStats> = BTreeMap::new();
    for tx in data {
        let day = daily.entry(tx.display_date.clone()).or_default();
        day.revenue += tx.total_order;
        day.orders += 1;
        day.income += tx.usable_income;
    }
    daily
}

fn order_type_rollup(data: &[StoredTransaction]) -> BTreeMap<String, OrderTypeStats> {
    let mut by_type: BTreeMap<String, OrderTypeStats> = BTreeMap::new();
    for tx in data {
        let stats = by_type.entry(tx.order_type.clone()).or_default();
        stats.count += 1;
        stats.revenue += tx.total_order;
    }

    for stats in by_type.values_mut() {
        if stats.count > 0 {
            stats.avg_value = stats.revenue / stats.count as f64;
        }
    }
    by_type
}

fn financial_breakdown(data: &[StoredTransaction]) -> FinancialBreakdown {
    data.iter().fold(FinancialBreakdown::default(), |mut acc, tx| {
        acc.commission += tx.commission;
        acc.saldo_savings += tx.saldo_savings;
        acc.bbm_savings += tx.bbm_savings;
        acc.oli_savings += tx.oli_savings;
        acc.net_income += tx.net_income;
        acc.usable_income += tx.usable_income;
        acc
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Confidence;

    pub(crate) fn tx(display_date: &str, order_type: &str, total: f64) -> StoredTransaction {
        StoredTransaction {
            timestamp: format!("{} 09:00:00", display_date),
            total_order: total,
            commission: total * 0.15,
            saldo_savings: total * 0.10,
            bbm_savings: total * 0.10,
            oli_savings: total * 0.10,
            net_income: total * 0.85,
            usable_income: total * 0.55,
            order_type: order_type.to_string(),
            custom_date: String::new(),
            display_date: display_date.to_string(),
        }
    }

    pub(crate) fn at(date: &str, hour: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .expect("date")
            .and_hms_opt(hour, 0, 0)
            .expect("time")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn sample() -> Vec<StoredTransaction> {
        vec![
            tx("2025-05-08", "Food", 20000.0),
            tx("2025-05-09", "Food", 10000.0),
            tx("2025-05-10", "Bike", 30000.0),
        ]
    }

    #[test]
    fn empty_ledger_gives_empty_analytics() {
        let analytics = compute_analytics(&[], at("2025-05-10", 14));
        assert_eq!(analytics.summary.total_orders, 0);
        assert!(analytics.daily_analytics.is_empty());
        assert!(analytics.ai_analysis.is_empty());
        assert!(analytics.financial_tips.is_empty());
        assert_eq!(analytics.earnings_prediction.confidence, Confidence::Low);
        assert!(analytics.chart_data.revenue_trend.labels.is_empty());
    }

    #[test]
    fn summary_totals_and_ratios() {
        let analytics = compute_analytics(&sample(), at("2025-05-10", 14));
        let summary = &analytics.summary;

        assert_eq!(summary.total_orders, 3);
        assert!(approx(summary.total_revenue, 60000.0));
        assert!(approx(summary.total_net_income, 51000.0));
        assert!(approx(summary.total_usable_income, 33000.0));
        assert!(approx(summary.avg_order_value, 20000.0));
        assert!(approx(summary.efficiency_ratio, 55.0));
        assert!(approx(summary.performance_score, 82.5));
    }

    #[test]
    fn performance_score_is_capped() {
        let mut rich = tx("2025-05-10", "Food", 10000.0);
        rich.usable_income = 9000.0;
        let analytics = compute_analytics(&[rich], at("2025-05-10", 14));
        assert!(approx(analytics.summary.efficiency_ratio, 90.0));
        assert!(approx(analytics.summary.performance_score, 100.0));
    }

    #[test]
    fn today_and_weekly_windows() {
        let data = vec![
            tx("2025-05-10", "Food", 10000.0),
            tx("2025-05-03", "Food", 20000.0),
            tx("2025-05-02", "Food", 40000.0),
            tx("2025-06-01", "Food", 5000.0),
            tx("not-a-date", "Food", 7000.0),
        ];
        let metrics = compute_analytics(&data, at("2025-05-10", 14)).time_metrics;

        assert_eq!(metrics.today_orders, 1);
        assert!(approx(metrics.today_revenue, 10000.0));
        // 05-03 is exactly 7 days back, 06-01 is in the future
        assert_eq!(metrics.weekly_orders, 3);
        assert!(approx(metrics.weekly_revenue, 35000.0));
    }

    #[test]
    fn daily_and_order_type_rollups() {
        let mut data = sample();
        data.push(tx("2025-05-10", "Food", 12000.0));
        let analytics = compute_analytics(&data, at("2025-05-10", 14));

        let days: Vec<&String> = analytics.daily_analytics.keys().collect();
        assert_eq!(days, vec!["2025-05-08", "2025-05-09", "2025-05-10"]);
        let last = &analytics.daily_analytics["2025-05-10"];
        assert_eq!(last.orders, 2);
        assert!(approx(last.revenue, 42000.0));
        assert!(approx(last.income, 42000.0 * 0.55));

        let food = &analytics.order_analytics["Food"];
        assert_eq!(food.count, 3);
        assert!(approx(food.revenue, 42000.0));
        assert!(approx(food.avg_value, 14000.0));
        assert_eq!(analytics.order_analytics["Bike"].count, 1);
    }

    #[test]
    fn breakdown_sums_every_bucket() {
        let breakdown = compute_analytics(&sample(), at("2025-05-10", 14)).financial_breakdown;
        assert!(approx(breakdown.commission, 9000.0));
        assert!(approx(breakdown.saldo_savings, 6000.0));
        assert!(approx(breakdown.bbm_savings, 6000.0));
        assert!(approx(breakdown.oli_savings, 6000.0));
        assert!(approx(breakdown.net_income, 51000.0));
        assert!(approx(breakdown.usable_income, 33000.0));

        let json = serde_json::to_value(&breakdown).expect("json");
        assert!(json.get("Komisi Maxim").is_some());
        assert!(json.get("Pendapatan Siap Pakai").is_some());
    }

    #[test]
    fn derived_sections_are_filled() {
        let analytics = compute_analytics(&sample(), at("2025-05-10", 14));

        let titles: Vec<&str> = analytics.ai_analysis.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Trend Positif", "Fokus Optimal"]);
        assert_eq!(analytics.financial_tips.len(), 1);
        assert_eq!(analytics.earnings_prediction.confidence, Confidence::Medium);
        assert!(approx(analytics.earnings_prediction.prediction, 140000.0));
        assert_eq!(analytics.chart_data.revenue_trend.labels.len(), 3);
    }
}
