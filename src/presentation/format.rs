//! Display formatting for prices and period changes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::series::PriceSeries;

/// Semantic color for a displayed value; the UI maps these to its theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Positive,
    Negative,
    Neutral,
    Gray,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Positive => "positive",
            ColorClass::Negative => "negative",
            ColorClass::Neutral => "neutral",
            ColorClass::Gray => "gray",
        }
    }
}

/// Format a price according to its quoted units: currency prefix for
/// USD/CNY quotes, three decimals for per-pound prices, two otherwise.
pub fn format_price(price: f64, units: &str) -> String {
    let decimals = if units.contains("lb") { 3 } else { 2 };
    let number = group_thousands(price, decimals);

    if units.contains("USD") {
        format!("${}", number)
    } else if units.contains("CNY") {
        format!("CNY {}", number)
    } else {
        number
    }
}

/// Format a change for display. The text carries an explicit sign, a
/// magnitude-dependent precision and the percentage; a trailing `*`
/// marks changes computed from a degraded reference point rather than a
/// nearby observation.
pub fn format_change(
    change: Option<f64>,
    change_pct: Option<f64>,
    is_actual: bool,
) -> (String, ColorClass) {
    let (change, pct) = match (change, change_pct) {
        (Some(c), Some(p)) => (c, p),
        _ => return ("No data available".to_string(), ColorClass::Neutral),
    };

    if change.is_nan() || pct.is_nan() {
        return ("Invalid data".to_string(), ColorClass::Gray);
    }

    if change.abs() < 1e-6 || pct.abs() < 1e-6 {
        return ("No change (0.00%)".to_string(), ColorClass::Neutral);
    }

    let sign = if change > 0.0 { "+" } else { "" };
    let decimals = match change.abs() {
        c if c < 0.1 => 4,
        c if c < 1.0 => 3,
        c if c < 10.0 => 2,
        c if c < 100.0 => 1,
        _ => 0,
    };

    let change_str = format!("{}{:.*}", sign, decimals, change);
    let pct_str = format!("{}{:.2}%", sign, pct * 100.0);

    let mut text = format!("{} ({})", change_str, pct_str);
    if !is_actual {
        text.push_str(" *");
    }

    let color = if change > 0.0 {
        ColorClass::Positive
    } else {
        ColorClass::Negative
    };

    (text, color)
}

/// "Last updated" line for a series, relative to `as_of`
pub fn freshness_text(series: &PriceSeries, as_of: NaiveDate) -> String {
    let last_date = match series.iter().map(|p| p.date).max() {
        Some(date) => date,
        None => return "No data available".to_string(),
    };

    let days_ago = (as_of - last_date).num_days();
    let relative = match days_ago {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        n => format!("{} days ago", n),
    };

    format!("Last updated: {} ({})", last_date.format("%B %d, %Y"), relative)
}

/// Fixed-point rendering with thousands separators in the integer part
fn group_thousands(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value);
    let (number, fraction) = match raw.split_once('.') {
        Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
        None => (raw, None),
    };

    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number.as_str()),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
