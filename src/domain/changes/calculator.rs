//! Assembles the full change report for a series

use super::reference::{locate_reference, recent_reference, ReferencePoint};
use super::{ChangeSummary, Horizon, PeriodChange};
use crate::domain::series::{detect_frequency, FrequencyClass, PriceSeries};

/// Reference prices below this magnitude would blow up the percentage;
/// the percent change is clamped to zero instead of going infinite.
const MIN_REFERENCE_PRICE: f64 = 1e-4;

/// Compute the period changes for all five horizons plus sampling
/// metadata. Pure function: the input need not be sorted, and empty or
/// singleton series yield the all-`None` summary rather than an error.
pub fn compute_changes(series: &PriceSeries) -> ChangeSummary {
    let sorted = series.normalized();
    if sorted.len() < 2 {
        return ChangeSummary::empty();
    }

    let last = sorted.points[sorted.len() - 1];
    let (frequency_class, mean_gap) = detect_frequency(&sorted);

    let previous = recent_reference(&sorted, last.date, frequency_class);
    let (recent_change, recent_change_pct) = match previous {
        Some(p) => {
            let (abs, pct) = change_pair(last.price, p.price);
            (Some(abs), Some(pct))
        }
        None => (None, None),
    };

    let period = |horizon: Horizon| -> PeriodChange {
        period_change(last.price, locate_reference(&sorted, last.date, horizon))
    };

    // Which horizon matches how the data was actually sampled. Daily
    // data that averages a gap above three days reads better weekly.
    let daily_native = frequency_class == FrequencyClass::Daily && mean_gap <= 3.0;
    let weekly_native = (frequency_class == FrequencyClass::Weekly
        && mean_gap > 3.0
        && mean_gap <= 10.0)
        || (frequency_class == FrequencyClass::Daily && !daily_native);

    let best_display_period = if daily_native {
        Horizon::Day
    } else if weekly_native {
        Horizon::Week
    } else {
        Horizon::Month
    };

    ChangeSummary {
        last_price: Some(last.price),
        last_date: Some(last.date),
        frequency_class,
        mean_gap_days: Some(mean_gap),
        previous_price: previous.map(|p| p.price),
        recent_change,
        recent_change_pct,
        day: period(Horizon::Day),
        week: period(Horizon::Week),
        month: period(Horizon::Month),
        year: period(Horizon::Year),
        ytd: period(Horizon::YearToDate),
        best_display_period: Some(best_display_period),
    }
}

fn period_change(last_price: f64, reference: Option<ReferencePoint>) -> PeriodChange {
    match reference {
        Some(r) => {
            let (abs, pct) = change_pair(last_price, r.price);
            PeriodChange {
                reference_price: Some(r.price),
                reference_date: Some(r.date),
                absolute_change: Some(abs),
                percent_change: Some(pct),
                is_actual_observation: r.is_actual,
            }
        }
        None => PeriodChange::default(),
    }
}

fn change_pair(current: f64, reference: f64) -> (f64, f64) {
    let absolute = current - reference;
    let percent = if reference.abs() >= MIN_REFERENCE_PRICE {
        absolute / reference
    } else {
        0.0
    };
    (absolute, percent)
}
