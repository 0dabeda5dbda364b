use std::collections::BTreeMap;

use plotters::prelude::*;

use crate::models::{ChartData, DailyPerformance, DailyStats, Series, StoredTransaction};
use crate::utils::AppError;

const REVENUE_TREND_DAYS: usize = 7;
const DAILY_PERFORMANCE_DAYS: usize = 5;
const GRID_LINES: usize = 4;

/// Build the datasets rendered by the dashboard's charts
pub fn generate_chart_data(
    data: &[StoredTransaction],
    daily: &BTreeMap<String, DailyStats>,
) -> ChartData {
    if data.is_empty() {
        return ChartData::default();
    }

    let trend = last_days(daily, REVENUE_TREND_DAYS);
    let revenue_trend = Series {
        labels: trend.iter().map(|(date, _)| date.to_string()).collect(),
        data: trend.iter().map(|(_, stats)| stats.revenue).collect(),
    };

    let mut type_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for tx in data {
        *type_counts.entry(tx.order_type.as_str()).or_insert(0) += 1;
    }
    let order_types = Series {
        labels: type_counts.keys().map(|name| name.to_string()).collect(),
        data: type_counts.values().copied().collect(),
    };

    let income_breakdown = Series {
        labels: vec![
            "Komisi".to_string(),
            "Tabungan".to_string(),
            "Pendapatan Bersih".to_string(),
        ],
        data: vec![
            data.iter().map(|t| t.commission).sum(),
            data.iter().map(|t| t.total_savings()).sum(),
            data.iter().map(|t| t.net_income).sum(),
        ],
    };

    let recent = last_days(daily, DAILY_PERFORMANCE_DAYS);
    let daily_performance = DailyPerformance {
        labels: recent.iter().map(|(date, _)| date.to_string()).collect(),
        revenue: recent.iter().map(|(_, stats)| stats.revenue).collect(),
        orders: recent.iter().map(|(_, stats)| stats.orders).collect(),
    };

    ChartData {
        revenue_trend,
        order_types,
        income_breakdown,
        daily_performance,
    }
}

/// The most recent `count` days in ascending date order
fn last_days(daily: &BTreeMap<String, DailyStats>, count: usize) -> Vec<(&str, &DailyStats)> {
    let skip = daily.len().saturating_sub(count);
    daily
        .iter()
        .skip(skip)
        .map(|(date, stats)| (date.as_str(), stats))
        .collect()
}

/// Render the last week's revenue as a standalone SVG line chart
pub fn render_revenue_svg(
    daily: &BTreeMap<String, DailyStats>,
    width: u32,
    height: u32,
) -> Result<String, AppError> {
    let points: Vec<(f64, f64)> = last_days(daily, REVENUE_TREND_DAYS)
        .iter()
        .enumerate()
        .map(|(i, (_, stats))| (i as f64, stats.revenue))
        .collect();

    if points.len() < 2 {
        return Err(AppError::Validation(
            "❌ Not enough data to generate chart (minimum 2 days required).".to_string(),
        ));
    }

    let max_revenue = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let min_revenue = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let padding = (max_revenue - min_revenue).max(1.0) * 0.1;
    let y_min = (min_revenue - padding).max(0.0);
    let y_max = max_revenue + padding;
    let x_max = (points.len() - 1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| AppError::Internal(format!("Failed to fill canvas: {}", e)))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)
            .map_err(|e| AppError::Internal(format!("Failed to build chart: {}", e)))?;

        // Horizontal guides, drawn without labels so no font is needed
        let step = (y_max - y_min) / GRID_LINES as f64;
        chart
            .draw_series((0..=GRID_LINES).map(|i| {
                let y = y_min + step * i as f64;
                PathElement::new(vec![(0.0, y), (x_max, y)], RGBColor(229, 231, 235))
            }))
            .map_err(|e| AppError::Internal(format!("Failed to draw grid: {}", e)))?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
            .map_err(|e| AppError::Internal(format!("Failed to draw line: {}", e)))?;

        chart
            .draw_series(points.iter().map(|&point| Circle::new(point, 4, BLUE.filled())))
            .map_err(|e| AppError::Internal(format!("Failed to draw point: {}", e)))?;

        root.present()
            .map_err(|e| AppError::Internal(format!("Failed to render chart: {}", e)))?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics_service::tests::tx;

    fn daily_for(data: &[StoredTransaction]) -> BTreeMap<String, DailyStats> {
        let mut daily: BTreeMap<String, DailyStats> = BTreeMap::new();
        for t in data {
            let day = daily.entry(t.display_date.clone()).or_default();
            day.revenue += t.total_order;
            day.orders += 1;
            day.income += t.usable_income;
        }
        daily
    }

    fn week_and_a_half() -> Vec<StoredTransaction> {
        (1..=10)
            .map(|day| tx(&format!("2025-05-{:02}", day), "Food", day as f64 * 1000.0))
            .collect()
    }

    #[test]
    fn empty_data_gives_empty_charts() {
        assert_eq!(generate_chart_data(&[], &BTreeMap::new()), ChartData::default());
    }

    #[test]
    fn trend_and_performance_keep_latest_days() {
        let data = week_and_a_half();
        let charts = generate_chart_data(&data, &daily_for(&data));

        assert_eq!(charts.revenue_trend.labels.len(), 7);
        assert_eq!(charts.revenue_trend.labels[0], "2025-05-04");
        assert_eq!(charts.revenue_trend.data.last(), Some(&10000.0));

        assert_eq!(
            charts.daily_performance.labels,
            vec!["2025-05-06", "2025-05-07", "2025-05-08", "2025-05-09", "2025-05-10"]
        );
        assert_eq!(charts.daily_performance.orders, vec![1; 5]);
    }

    #[test]
    fn order_types_and_breakdown() {
        let data = vec![
            tx("2025-05-01", "Food", 10000.0),
            tx("2025-05-01", "Bike", 20000.0),
            tx("2025-05-02", "Food", 10000.0),
        ];
        let charts = generate_chart_data(&data, &daily_for(&data));

        assert_eq!(charts.order_types.labels, vec!["Bike", "Food"]);
        assert_eq!(charts.order_types.data, vec![1, 2]);

        assert_eq!(charts.income_breakdown.labels, vec!["Komisi", "Tabungan", "Pendapatan Bersih"]);
        let values = &charts.income_breakdown.data;
        assert!((values[0] - 6000.0).abs() < 1e-6);
        assert!((values[1] - 12000.0).abs() < 1e-6);
        assert!((values[2] - 34000.0).abs() < 1e-6);
    }

    #[test]
    fn svg_needs_two_days() {
        let data = vec![tx("2025-05-01", "Food", 10000.0)];
        let err = render_revenue_svg(&daily_for(&data), 640, 320).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn svg_is_rendered() {
        let data = week_and_a_half();
        let svg = render_revenue_svg(&daily_for(&data), 640, 320).expect("svg");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("<circle"));
    }
}
