//! Reference point location for period-change baselines.
//!
//! Market data sampled weekly or monthly rarely has an observation at an
//! exact N-days-ago date, so each horizon searches tiered date windows:
//! a tight window around the target lag first, a wider one second, and a
//! degraded last resort that is flagged as not backed by a nearby sample.

use chrono::NaiveDate;

use super::{jan_first, Horizon};
use crate::domain::series::{FrequencyClass, PricePoint, PriceSeries};

/// The historical observation chosen as the baseline for one horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub price: f64,
    pub date: NaiveDate,
    pub is_actual: bool,
}

impl ReferencePoint {
    fn actual(point: &PricePoint) -> Self {
        Self {
            price: point.price,
            date: point.date,
            is_actual: true,
        }
    }

    fn fallback(point: &PricePoint) -> Self {
        Self {
            price: point.price,
            date: point.date,
            is_actual: false,
        }
    }
}

/// Find the baseline observation for `horizon`, searching backwards from
/// `last_date` over a date-ascending series.
///
/// Returns `None` only for an empty series. A series with no observation
/// strictly before `last_date` degrades to its first point for every
/// horizon.
pub fn locate_reference(
    series: &PriceSeries,
    last_date: NaiveDate,
    horizon: Horizon,
) -> Option<ReferencePoint> {
    let first = series.first()?;

    if !series.iter().any(|p| p.date < last_date) {
        return Some(ReferencePoint::fallback(first));
    }

    let reference = match horizon {
        Horizon::Day => {
            // The tight window is already lenient enough to absorb
            // weekends and holidays.
            closest_in_window(series, last_date, 1, 5, 1)
                .map(ReferencePoint::actual)
                .unwrap_or_else(|| {
                    ReferencePoint::fallback(&series.points[series.len() - 2])
                })
        }
        Horizon::Week => tiered(series, last_date, (6, 9), (5, 14), 7),
        Horizon::Month => tiered(series, last_date, (28, 32), (20, 40), 30),
        Horizon::Year => tiered(series, last_date, (360, 370), (300, 430), 365),
        Horizon::YearToDate => year_to_date(series, last_date, first),
    };

    Some(reference)
}

/// Tight window, wider window, then the latest available point before
/// `last_date` flagged as a fallback.
fn tiered(
    series: &PriceSeries,
    last_date: NaiveDate,
    tight: (i64, i64),
    wide: (i64, i64),
    target: i64,
) -> ReferencePoint {
    closest_in_window(series, last_date, tight.0, tight.1, target)
        .or_else(|| closest_in_window(series, last_date, wide.0, wide.1, target))
        .map(ReferencePoint::actual)
        .unwrap_or_else(|| {
            // A point before last_date exists; checked by the caller.
            ReferencePoint::fallback(latest_before(series, last_date))
        })
}

/// Earliest observation of the last date's calendar year; failing that,
/// the latest observation from before January 1st.
fn year_to_date(series: &PriceSeries, last_date: NaiveDate, first: &PricePoint) -> ReferencePoint {
    let jan_1 = jan_first(last_date);

    if let Some(point) = series.iter().find(|p| p.date >= jan_1) {
        return ReferencePoint::actual(point);
    }

    match series.iter().rev().find(|p| p.date <= jan_1) {
        Some(point) => ReferencePoint::fallback(point),
        None => ReferencePoint::fallback(first),
    }
}

/// Point whose lag from `last_date` falls in the closed window
/// `[lo, hi]`, closest to `target` days back. Ties go to the earlier
/// date.
fn closest_in_window<'a>(
    series: &'a PriceSeries,
    last_date: NaiveDate,
    lo: i64,
    hi: i64,
    target: i64,
) -> Option<&'a PricePoint> {
    let mut best: Option<(&PricePoint, i64)> = None;

    for point in series.iter() {
        let back = (last_date - point.date).num_days();
        if back < lo || back > hi {
            continue;
        }
        let distance = (back - target).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((point, distance));
        }
    }

    best.map(|(point, _)| point)
}

fn latest_before(series: &PriceSeries, last_date: NaiveDate) -> &PricePoint {
    series
        .iter()
        .rev()
        .find(|p| p.date < last_date)
        .unwrap_or(&series.points[0])
}

/// Frequency-appropriate previous observation used for the headline
/// "change since last print" figure: roughly one sampling step back,
/// with progressively looser fallbacks for gappy data.
pub fn recent_reference(
    series: &PriceSeries,
    last_date: NaiveDate,
    frequency: FrequencyClass,
) -> Option<PricePoint> {
    if series.len() < 2 {
        return series.first().copied();
    }

    // Everything except the last observation, latest first.
    let earlier = &series.points[..series.len() - 1];
    let back = |p: &PricePoint| (last_date - p.date).num_days();

    let found = match frequency {
        FrequencyClass::Daily => earlier
            .iter()
            .rev()
            .find(|p| (1..=3).contains(&back(p))),
        FrequencyClass::Weekly => earlier
            .iter()
            .rev()
            .find(|p| (5..=10).contains(&back(p)))
            .or_else(|| earlier.iter().rev().find(|p| back(p) >= 3)),
        FrequencyClass::Monthly | FrequencyClass::Unknown => earlier
            .iter()
            .rev()
            .find(|p| (25..=35).contains(&back(p)))
            .or_else(|| {
                earlier
                    .iter()
                    .rev()
                    .filter(|p| back(p) > 7)
                    .min_by_key(|p| (back(p) - 30).abs())
            })
            .or_else(|| earlier.iter().rev().find(|p| back(p) >= 14)),
    };

    Some(*found.unwrap_or(&earlier[earlier.len() - 1]))
}
