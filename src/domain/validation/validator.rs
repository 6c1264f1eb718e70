//! Statistical quality checks for commodity price series

use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;

use super::{SeriesMetrics, ValidationResult, ValidationSummary};
use crate::domain::series::PriceSeries;

/// Z-score beyond which an observation counts as an outlier
const OUTLIER_Z_SCORE: f64 = 3.0;

/// Consecutive move larger than this fraction counts as a price jump
const JUMP_THRESHOLD: f64 = 0.5;

/// Validates commodity price data for quality and consistency.
///
/// Carries an explicit `as_of` date so that the future-date check stays a
/// pure function of its inputs; production callers use [`DataValidator::new`],
/// tests pin the date.
#[derive(Debug, Clone)]
pub struct DataValidator {
    as_of: NaiveDate,
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator {
    pub fn new() -> Self {
        Self {
            as_of: Utc::now().date_naive(),
        }
    }

    pub fn with_as_of(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    /// Run every quality check against one series. All checks run; each
    /// failing check appends its own issue, and the metrics are computed
    /// even when issues exist. Never panics or errors: bad input turns
    /// into an invalid result.
    pub fn validate(&self, series: &PriceSeries, commodity: &str) -> ValidationResult {
        if series.is_empty() {
            return ValidationResult {
                commodity: commodity.to_string(),
                is_valid: false,
                issues: vec!["no data available".to_string()],
                metrics: None,
            };
        }

        let mut issues = Vec::new();

        let missing = series.iter().filter(|p| p.price.is_nan()).count();
        if missing > 0 {
            issues.push(format!("Contains {} missing values", missing));
        }

        let negative = series.iter().filter(|p| p.price < 0.0).count();
        if negative > 0 {
            issues.push(format!("Contains {} negative prices", negative));
        }

        if series.points.windows(2).any(|w| w[1].date < w[0].date) {
            issues.push("Dates are not in ascending order".to_string());
        }

        let duplicates = count_duplicate_dates(series);
        if duplicates > 0 {
            issues.push(format!("Contains {} duplicate dates", duplicates));
        }

        let future = series.iter().filter(|p| p.date > self.as_of).count();
        if future > 0 {
            issues.push(format!("Contains {} dates in the future", future));
        }

        let mut metrics = basic_metrics(series);

        let outliers = count_outliers(series, &metrics);
        if outliers > 0 {
            issues.push(format!(
                "Contains {} potential outliers (|z-score| > {})",
                outliers, OUTLIER_Z_SCORE
            ));
            metrics.outliers = Some(outliers);
        }

        let jumps = count_large_jumps(&series.normalized());
        if jumps > 0 {
            issues.push(format!("Contains {} large price jumps (>50% change)", jumps));
            metrics.large_jumps = Some(jumps);
        }

        ValidationResult {
            commodity: commodity.to_string(),
            is_valid: issues.is_empty(),
            issues,
            metrics: Some(metrics),
        }
    }

    /// Validate a whole batch of named series
    pub fn validate_all(
        &self,
        data: &BTreeMap<String, PriceSeries>,
    ) -> BTreeMap<String, ValidationResult> {
        data.iter()
            .map(|(name, series)| (name.clone(), self.validate(series, name)))
            .collect()
    }

    pub fn summarize(results: &BTreeMap<String, ValidationResult>) -> ValidationSummary {
        ValidationSummary::from_results(results.values())
    }
}

fn count_duplicate_dates(series: &PriceSeries) -> usize {
    let mut seen = std::collections::BTreeSet::new();
    series.iter().filter(|p| !seen.insert(p.date)).count()
}

fn basic_metrics(series: &PriceSeries) -> SeriesMetrics {
    let present: Vec<f64> = series
        .iter()
        .map(|p| p.price)
        .filter(|v| !v.is_nan())
        .collect();

    let mean = if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    };

    let std_dev = mean.and_then(|m| sample_std_dev(&present, m));

    let mut sorted = present.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(sorted[n / 2]),
        n => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    };

    let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
    let date_range = match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => Some((*min, *max)),
        _ => None,
    };

    SeriesMetrics {
        count: series.len(),
        min_price: sorted.first().copied(),
        max_price: sorted.last().copied(),
        mean_price: mean,
        median_price: median,
        std_dev,
        date_range,
        outliers: None,
        large_jumps: None,
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn count_outliers(series: &PriceSeries, metrics: &SeriesMetrics) -> usize {
    match (metrics.mean_price, metrics.std_dev) {
        (Some(mean), Some(std)) if std > 0.0 => series
            .iter()
            .filter(|p| !p.price.is_nan() && ((p.price - mean) / std).abs() > OUTLIER_Z_SCORE)
            .count(),
        _ => 0,
    }
}

fn count_large_jumps(sorted: &PriceSeries) -> usize {
    sorted
        .points
        .windows(2)
        .filter(|w| {
            let (prev, cur) = (w[0].price, w[1].price);
            if prev.is_nan() || cur.is_nan() {
                return false;
            }
            ((cur - prev) / prev).abs() > JUMP_THRESHOLD
        })
        .count()
}
