//! Sampling-frequency detection from inter-observation gaps

use serde::{Deserialize, Serialize};

use super::PriceSeries;

/// How many leading date gaps to sample when classifying a series
const GAP_SAMPLE: usize = 10;

/// Mean gap assumed when a series is too short to classify. Treating
/// unknown data as monthly biases the reference-point search toward the
/// widest tolerance windows.
pub const UNKNOWN_MEAN_GAP: f64 = 30.0;

/// Sampling cadence inferred from the data itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyClass {
    Daily,
    Weekly,
    Monthly,
    Unknown,
}

impl FrequencyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyClass::Daily => "daily",
            FrequencyClass::Weekly => "weekly",
            FrequencyClass::Monthly => "monthly",
            FrequencyClass::Unknown => "unknown",
        }
    }
}

/// Classify a series by the mean gap (in days) between up to its first
/// ten consecutive observation pairs. Returns `(Unknown, 30.0)` for
/// series with fewer than two points.
///
/// Expects date-ascending input; callers normalize first.
pub fn detect_frequency(series: &PriceSeries) -> (FrequencyClass, f64) {
    if series.len() < 2 {
        return (FrequencyClass::Unknown, UNKNOWN_MEAN_GAP);
    }

    let gaps: Vec<i64> = series
        .points
        .windows(2)
        .take(GAP_SAMPLE)
        .map(|w| (w[1].date - w[0].date).num_days())
        .collect();

    let mean_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

    let class = if mean_gap < 3.0 {
        FrequencyClass::Daily
    } else if mean_gap <= 10.0 {
        FrequencyClass::Weekly
    } else {
        FrequencyClass::Monthly
    };

    (class, mean_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use chrono::NaiveDate;

    fn series_with_gap(gap_days: i64, count: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = (0..count)
            .map(|i| {
                PricePoint::new(start + chrono::Duration::days(i as i64 * gap_days), 100.0)
            })
            .collect();
        PriceSeries::from_points(points)
    }

    #[test]
    fn test_daily_series() {
        let (class, gap) = detect_frequency(&series_with_gap(1, 20));
        assert_eq!(class, FrequencyClass::Daily);
        assert_eq!(gap, 1.0);
    }

    #[test]
    fn test_weekly_series() {
        let (class, gap) = detect_frequency(&series_with_gap(7, 20));
        assert_eq!(class, FrequencyClass::Weekly);
        assert_eq!(gap, 7.0);
    }

    #[test]
    fn test_monthly_series() {
        let (class, gap) = detect_frequency(&series_with_gap(30, 20));
        assert_eq!(class, FrequencyClass::Monthly);
        assert_eq!(gap, 30.0);
    }

    #[test]
    fn test_ten_day_gap_is_weekly() {
        let (class, _) = detect_frequency(&series_with_gap(10, 5));
        assert_eq!(class, FrequencyClass::Weekly);
    }

    #[test]
    fn test_short_series_is_unknown() {
        let (class, gap) = detect_frequency(&series_with_gap(1, 1));
        assert_eq!(class, FrequencyClass::Unknown);
        assert_eq!(gap, UNKNOWN_MEAN_GAP);

        let (class, gap) = detect_frequency(&PriceSeries::new());
        assert_eq!(class, FrequencyClass::Unknown);
        assert_eq!(gap, UNKNOWN_MEAN_GAP);
    }

    #[test]
    fn test_only_first_ten_gaps_considered() {
        // Ten daily gaps followed by a huge gap: the tail is ignored.
        let mut series = series_with_gap(1, 11);
        series.push(PricePoint::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            100.0,
        ));

        let (class, gap) = detect_frequency(&series);
        assert_eq!(class, FrequencyClass::Daily);
        assert_eq!(gap, 1.0);
    }
}
