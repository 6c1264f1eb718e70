//! Snapshot logging - persists validation results, data captures and
//! price comparisons as JSON/CSV artifacts for later integrity review.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::changes::{ChangeSummary, Horizon};
use crate::domain::series::PriceSeries;
use crate::domain::validation::{ValidationResult, ValidationSummary};
use crate::shared::errors::SnapshotError;
use crate::shared::types::FetchFilters;
use crate::shared::utils::{generate_id, safe_file_stem};

/// Writes dashboard artifacts under a log directory:
///
/// ```text
/// logs/
///   validation/validation_<ts>.json     full validation results
///   validation/validation_summary.csv   append-only run summaries
///   data_capture/<ts>/<name>.csv        raw series per commodity
///   data_capture/snapshots_index.csv    append-only capture index
///   comparison/<name>_comparison.csv    reference prices over time
/// ```
pub struct DataLogger {
    validation_dir: PathBuf,
    data_capture_dir: PathBuf,
    comparison_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct ValidationSnapshot<'a> {
    timestamp: DateTime<Utc>,
    summary: &'a ValidationSummary,
    results: &'a BTreeMap<String, ValidationResult>,
}

#[derive(Debug, Serialize)]
struct FilterSnapshot<'a> {
    timestamp: DateTime<Utc>,
    filters: &'a FetchFilters,
}

impl DataLogger {
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self, SnapshotError> {
        let log_dir = log_dir.as_ref();
        let validation_dir = log_dir.join("validation");
        let data_capture_dir = log_dir.join("data_capture");
        let comparison_dir = log_dir.join("comparison");

        fs::create_dir_all(&validation_dir)?;
        fs::create_dir_all(&data_capture_dir)?;
        fs::create_dir_all(&comparison_dir)?;

        info!(log_dir = %log_dir.display(), "data logger initialized");

        Ok(Self {
            validation_dir,
            data_capture_dir,
            comparison_dir,
        })
    }

    /// Write the full validation results as JSON and append a one-line
    /// summary row to the running CSV. Returns the JSON path.
    pub fn log_validation_results(
        &self,
        results: &BTreeMap<String, ValidationResult>,
        timestamp: DateTime<Utc>,
    ) -> Result<PathBuf, SnapshotError> {
        let summary = ValidationSummary::from_results(results.values());

        let path = self
            .validation_dir
            .join(format!("validation_{}.json", stamp(timestamp)));
        let snapshot = ValidationSnapshot {
            timestamp,
            summary: &summary,
            results,
        };
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;

        let summary_path = self.validation_dir.join("validation_summary.csv");
        let mut writer = append_csv(
            &summary_path,
            &["timestamp", "total", "valid_count", "invalid_count", "issues"],
        )?;
        writer.write_record([
            timestamp.to_rfc3339(),
            summary.total.to_string(),
            summary.valid_count.to_string(),
            summary.invalid_count.to_string(),
            summary.issues_digest(),
        ])?;
        writer.flush().map_err(SnapshotError::from)?;

        info!(path = %path.display(), "validation results logged");
        Ok(path)
    }

    /// Dump every series to its own CSV under a timestamped directory
    /// and register the capture in the index. Returns the directory.
    pub fn capture_data_snapshot(
        &self,
        data: &BTreeMap<String, PriceSeries>,
        filters: Option<&FetchFilters>,
        timestamp: DateTime<Utc>,
    ) -> Result<PathBuf, SnapshotError> {
        let snapshot_dir = self.data_capture_dir.join(stamp(timestamp));
        fs::create_dir_all(&snapshot_dir)?;

        if let Some(filters) = filters {
            let snapshot = FilterSnapshot { timestamp, filters };
            fs::write(
                snapshot_dir.join("filters.json"),
                serde_json::to_string_pretty(&snapshot)?,
            )?;
        }

        for (name, series) in data {
            let path = snapshot_dir.join(format!("{}.csv", safe_file_stem(name)));
            let mut writer = csv::Writer::from_writer(File::create(path)?);
            writer.write_record(["date", "price"])?;
            for point in series.iter() {
                writer.write_record([point.date.to_string(), point.price.to_string()])?;
            }
            writer.flush().map_err(SnapshotError::from)?;
        }

        let index_path = self.data_capture_dir.join("snapshots_index.csv");
        let mut writer = append_csv(
            &index_path,
            &["timestamp", "run_id", "commodities", "directory"],
        )?;
        writer.write_record([
            timestamp.to_rfc3339(),
            generate_id(),
            data.len().to_string(),
            snapshot_dir.display().to_string(),
        ])?;
        writer.flush().map_err(SnapshotError::from)?;

        info!(dir = %snapshot_dir.display(), commodities = data.len(), "data snapshot captured");
        Ok(snapshot_dir)
    }

    /// Append the current price and per-horizon reference prices for one
    /// commodity to its comparison log
    pub fn log_price_comparison(
        &self,
        commodity: &str,
        summary: &ChangeSummary,
        timestamp: DateTime<Utc>,
    ) -> Result<(), SnapshotError> {
        let path = self
            .comparison_dir
            .join(format!("{}_comparison.csv", safe_file_stem(commodity)));

        let mut writer = append_csv(
            &path,
            &["timestamp", "current", "1d", "1w", "1m", "1y", "ytd"],
        )?;

        let cell = |horizon: Horizon| -> String {
            summary
                .period(horizon)
                .reference_price
                .map(|p| p.to_string())
                .unwrap_or_default()
        };

        writer.write_record([
            timestamp.to_rfc3339(),
            summary
                .last_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            cell(Horizon::Day),
            cell(Horizon::Week),
            cell(Horizon::Month),
            cell(Horizon::Year),
            cell(Horizon::YearToDate),
        ])?;
        writer.flush().map_err(SnapshotError::from)
    }
}

fn stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d_%H%M%S").to_string()
}

/// Open an append-only CSV writer, emitting the header only when the
/// file is new
fn append_csv(path: &Path, header: &[&str]) -> Result<csv::Writer<File>, SnapshotError> {
    let exists = path.is_file();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);
    if !exists {
        writer.write_record(header)?;
    }
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::changes::compute_changes;
    use crate::domain::series::PricePoint;
    use crate::domain::validation::DataValidator;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn sample_series() -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_points(
            (0..30)
                .map(|i| PricePoint::new(start + Duration::days(i), 100.0 + i as f64))
                .collect(),
        )
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 28, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_validation_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let logger = DataLogger::new(dir.path()).unwrap();

        let validator = DataValidator::with_as_of(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        let mut data = BTreeMap::new();
        data.insert("Copper (Cu)".to_string(), sample_series());
        data.insert("Empty".to_string(), PriceSeries::new());
        let results = validator.validate_all(&data);

        let json_path = logger.log_validation_results(&results, ts()).unwrap();
        assert!(json_path.is_file());

        let content = fs::read_to_string(&json_path).unwrap();
        assert!(content.contains("no data available"));
        assert!(content.contains("Copper (Cu)"));

        // Second run appends without a second header.
        logger.log_validation_results(&results, ts()).unwrap();
        let summary = fs::read_to_string(dir.path().join("validation/validation_summary.csv")).unwrap();
        assert_eq!(summary.lines().count(), 3);
        assert!(summary.starts_with("timestamp,total,"));
    }

    #[test]
    fn test_data_capture_layout() {
        let dir = tempfile::tempdir().unwrap();
        let logger = DataLogger::new(dir.path()).unwrap();

        let mut data = BTreeMap::new();
        data.insert("Copper (Cu)".to_string(), sample_series());

        let snapshot_dir = logger
            .capture_data_snapshot(&data, Some(&FetchFilters::default()), ts())
            .unwrap();

        assert!(snapshot_dir.join("Copper_Cu.csv").is_file());
        assert!(snapshot_dir.join("filters.json").is_file());
        assert!(dir.path().join("data_capture/snapshots_index.csv").is_file());

        let csv = fs::read_to_string(snapshot_dir.join("Copper_Cu.csv")).unwrap();
        assert!(csv.starts_with("date,price"));
        assert_eq!(csv.lines().count(), 31);
    }

    #[test]
    fn test_price_comparison_appends() {
        let dir = tempfile::tempdir().unwrap();
        let logger = DataLogger::new(dir.path()).unwrap();

        let summary = compute_changes(&sample_series());
        logger
            .log_price_comparison("Copper (Cu)", &summary, ts())
            .unwrap();
        logger
            .log_price_comparison("Copper (Cu)", &summary, ts())
            .unwrap();

        let path = dir.path().join("comparison/Copper_Cu_comparison.csv");
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("timestamp,current,1d,1w,1m,1y,ytd"));
    }
}
