use std::collections::BTreeMap;

use crate::models::{
    Analytics, Confidence, DailyStats, EarningsPrediction, Insight, InsightKind, OrderTypeStats,
    Priority, Summary,
};
use crate::utils::{format_amount, format_percentage};

/// Horizon of the earnings projection, in days
pub const PREDICTION_DAYS: u32 = 7;

const MAX_INSIGHTS: usize = 5;
/// Days of history averaged by the projection
const PREDICTION_WINDOW: usize = 7;
/// Fewer distinct days than this and the projection is not attempted
const MIN_PREDICTION_DAYS: usize = 3;

/// Derive up to five heuristic insights, most urgent first.
/// `hour` is the current local hour (0-23).
pub fn analyze_performance(analytics: &Analytics, hour: u32) -> Vec<Insight> {
    let mut insights: Vec<Insight> = [
        efficiency_insight(analytics.summary.efficiency_ratio),
        trend_insight(&analytics.daily_analytics),
        focus_insight(&analytics.order_analytics),
        today_insight(analytics.time_metrics.today_revenue, hour),
    ]
    .into_iter()
    .flatten()
    .collect();

    insights.sort_by_key(|insight| insight.priority);
    insights.truncate(MAX_INSIGHTS);
    insights
}

fn efficiency_insight(efficiency: f64) -> Option<Insight> {
    if efficiency > 75.0 {
        Some(Insight::new(
            InsightKind::Success,
            "🚀",
            "Efisiensi Elite",
            format!("Efisiensi {} - Performa luar biasa!", format_percentage(efficiency)),
            Priority::High,
        ))
    } else if efficiency > 60.0 {
        Some(Insight::new(
            InsightKind::Success,
            "⭐",
            "Efisiensi Optimal",
            format!("Efisiensi {} - Pertahankan!", format_percentage(efficiency)),
            Priority::Medium,
        ))
    } else if efficiency < 40.0 {
        Some(Insight::new(
            InsightKind::Warning,
            "⚡",
            "Butuh Optimasi",
            format!("Efisiensi {} - Perlu evaluasi strategi", format_percentage(efficiency)),
            Priority::High,
        ))
    } else {
        None
    }
}

/// Compares the two most recent days once at least three days exist
fn trend_insight(daily: &BTreeMap<String, DailyStats>) -> Option<Insight> {
    if daily.len() < 3 {
        return None;
    }

    let mut recent = daily.values().rev();
    let latest = recent.next()?.revenue;
    let previous = recent.next()?.revenue;
    let trend = latest - previous;

    if trend > 0.0 {
        Some(Insight::new(
            InsightKind::Success,
            "📈",
            "Trend Positif",
            format!("Revenue naik {} dari hari sebelumnya", format_amount(trend)),
            Priority::Medium,
        ))
    } else if trend < 0.0 {
        Some(Insight::new(
            InsightKind::Warning,
            "📉",
            "Trend Menurun",
            format!("Revenue turun {} dari hari sebelumnya", format_amount(trend.abs())),
            Priority::High,
        ))
    } else {
        None
    }
}

/// Points at the order type with the best average value when it clearly beats the worst
fn focus_insight(order_analytics: &BTreeMap<String, OrderTypeStats>) -> Option<Insight> {
    let mut valid = order_analytics.iter().filter(|(_, stats)| stats.count > 0);
    let first = valid.next()?;

    let (best, worst) = valid.fold((first, first), |(best, worst), item| {
        let best = if item.1.avg_value > best.1.avg_value { item } else { best };
        let worst = if item.1.avg_value < worst.1.avg_value { item } else { worst };
        (best, worst)
    });

    if best.1.avg_value > worst.1.avg_value * 1.5 {
        Some(Insight::new(
            InsightKind::Info,
            "🎯",
            "Fokus Optimal",
            format!("{} menghasilkan {}/order", best.0, format_amount(best.1.avg_value)),
            Priority::Medium,
        ))
    } else {
        None
    }
}

/// Extrapolates today's revenue over a twelve-hour shift
fn today_insight(today_revenue: f64, hour: u32) -> Option<Insight> {
    if today_revenue <= 0.0 || hour == 0 {
        return None;
    }

    let expected = today_revenue / hour as f64 * 12.0;
    if expected > today_revenue * 1.2 {
        Some(Insight::new(
            InsightKind::Success,
            "🎉",
            "Performa Cemerlang",
            format!("Diperkirakan {} hari ini", format_amount(expected)),
            Priority::Medium,
        ))
    } else {
        None
    }
}

/// Short advice strings based on volume, efficiency and time of day
pub fn generate_financial_tips(summary: &Summary, hour: u32) -> Vec<String> {
    let mut tips = Vec::new();

    if summary.total_orders < 10 {
        tips.push("💡 **Mulai Kecil**: Fokus pada konsistensi daripada quantity".to_string());
    } else if summary.total_orders < 50 {
        tips.push("💡 **Scale Up**: Pertimbangkan untuk meningkatkan volume order".to_string());
    } else {
        tips.push("💡 **Expert Level**: Optimasi dengan premium orders".to_string());
    }

    if summary.efficiency_ratio < 50.0 {
        tips.push("💰 **Optimasi Biaya**: Review pengeluaran BBM dan maintenance".to_string());
    } else if summary.efficiency_ratio > 70.0 {
        tips.push("💰 **Strategi Solid**: Pertahankan model bisnis current".to_string());
    }

    match hour {
        7..=9 => tips.push("⏰ **Morning Rush**: Fokus pada jam sibuk pagi".to_string()),
        16..=19 => tips.push("⏰ **Evening Peak**: Manfaatkan jam pulang kerja".to_string()),
        _ => {}
    }

    tips
}

/// Project revenue over `days` from the average of the most recent daily totals
pub fn predict_earnings(daily: &BTreeMap<String, DailyStats>, days: u32) -> EarningsPrediction {
    if daily.len() < MIN_PREDICTION_DAYS {
        return EarningsPrediction::default();
    }

    let revenues: Vec<f64> = daily
        .values()
        .rev()
        .take(PREDICTION_WINDOW)
        .map(|day| day.revenue)
        .collect();
    let daily_average = revenues.iter().sum::<f64>() / revenues.len() as f64;

    EarningsPrediction {
        prediction: daily_average * days as f64,
        confidence: if revenues.len() >= 5 {
            Confidence::High
        } else {
            Confidence::Medium
        },
        daily_average,
    }
}
