//! Series domain - price history types and sampling utilities

mod frequency;

pub use frequency::{detect_frequency, FrequencyClass};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Ordered price history for one instrument.
///
/// Construction does not enforce date order; callers that need ascending
/// dates go through [`PriceSeries::normalized`]. Duplicate dates are kept
/// here and reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: PricePoint) {
        self.points.push(point);
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    /// Date-ascending copy. The sort is stable, so same-date observations
    /// keep their original order. Empty input stays empty.
    pub fn normalized(&self) -> PriceSeries {
        let mut points = self.points.clone();
        points.sort_by_key(|p| p.date);
        PriceSeries { points }
    }
}

/// Free-function form of [`PriceSeries::normalized`]
pub fn normalize(series: &PriceSeries) -> PriceSeries {
    series.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_normalize_sorts_by_date() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(d(2024, 3, 1), 3.0),
            PricePoint::new(d(2024, 1, 1), 1.0),
            PricePoint::new(d(2024, 2, 1), 2.0),
        ]);

        let sorted = series.normalized();
        let dates: Vec<NaiveDate> = sorted.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(d(2024, 2, 1), 2.0),
            PricePoint::new(d(2024, 1, 1), 1.0),
            PricePoint::new(d(2024, 1, 1), 1.5),
        ]);

        let once = series.normalized();
        let twice = once.normalized();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_stable_on_duplicate_dates() {
        let series = PriceSeries::from_points(vec![
            PricePoint::new(d(2024, 1, 5), 10.0),
            PricePoint::new(d(2024, 1, 2), 1.0),
            PricePoint::new(d(2024, 1, 2), 2.0),
        ]);

        let sorted = series.normalized();
        // Ties keep original order: 1.0 before 2.0.
        assert_eq!(sorted.points[0].price, 1.0);
        assert_eq!(sorted.points[1].price, 2.0);
    }

    #[test]
    fn test_normalize_empty() {
        let series = PriceSeries::new();
        assert!(series.normalized().is_empty());
    }
}
