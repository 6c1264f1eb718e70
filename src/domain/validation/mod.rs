//! Validation domain - data quality checks for price series

mod validator;

pub use validator::DataValidator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics for one series, computed over the prices that
/// are present (NaN observations are excluded from the statistics but
/// still counted as missing values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetrics {
    pub count: usize,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub mean_price: Option<f64>,
    pub median_price: Option<f64>,
    pub std_dev: Option<f64>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub outliers: Option<usize>,
    pub large_jumps: Option<usize>,
}

/// Outcome of validating one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub commodity: String,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub metrics: Option<SeriesMetrics>,
}

/// Aggregate view over a batch of validation results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub issues_by_commodity: BTreeMap<String, Vec<String>>,
}

impl ValidationSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationResult>,
    {
        let mut total = 0;
        let mut valid_count = 0;
        let mut issues_by_commodity = BTreeMap::new();

        for result in results {
            total += 1;
            if result.is_valid {
                valid_count += 1;
            } else {
                issues_by_commodity.insert(result.commodity.clone(), result.issues.clone());
            }
        }

        Self {
            total,
            valid_count,
            invalid_count: total - valid_count,
            issues_by_commodity,
        }
    }

    /// One-line digest of recurring issues, e.g. for a CSV log row
    pub fn issues_digest(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for issues in self.issues_by_commodity.values() {
            for issue in issues {
                *counts.entry(issue.as_str()).or_insert(0) += 1;
            }
        }

        counts
            .iter()
            .map(|(issue, count)| format!("{} ({})", issue, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
