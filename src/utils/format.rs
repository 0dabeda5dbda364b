//! Number, currency and date helpers shared by services and page rendering

use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an amount as Indonesian Rupiah, e.g. `Rp 25.000`.
/// Fractions are truncated.
pub fn format_rupiah(amount: f64) -> String {
    let whole = amount.trunc() as i64;
    let grouped = group_digits(whole.unsigned_abs(), '.');
    if whole < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Round to a whole number and group thousands with commas, e.g. `1,500`
pub fn format_amount(value: f64) -> String {
    let whole = value.round() as i64;
    let grouped = group_digits(whole.unsigned_abs(), ',');
    if whole < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Clean a numeric cell coming from the ledger.
///
/// Keeps only digits, `.` and `-` so values such as `Rp 25.000,00` or
/// `" 1500 "` still load; anything unparsable becomes `0.0`.
pub fn clean_numeric(value: &str) -> f64 {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
        return 0.0;
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}
