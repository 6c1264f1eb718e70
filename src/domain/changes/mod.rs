//! Changes domain - period-over-period price change engine

mod calculator;
mod reference;

pub use calculator::compute_changes;
pub use reference::{locate_reference, recent_reference, ReferencePoint};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::series::FrequencyClass;

/// Fixed lookback periods reported for every series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl Horizon {
    pub const ALL: [Horizon; 5] = [
        Horizon::Day,
        Horizon::Week,
        Horizon::Month,
        Horizon::Year,
        Horizon::YearToDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Day => "1d",
            Horizon::Week => "1w",
            Horizon::Month => "1m",
            Horizon::Year => "1y",
            Horizon::YearToDate => "ytd",
        }
    }

    /// Target lag in whole days back from `last_date`
    pub fn target_lag_days(&self, last_date: NaiveDate) -> i64 {
        match self {
            Horizon::Day => 1,
            Horizon::Week => 7,
            Horizon::Month => 30,
            Horizon::Year => 365,
            Horizon::YearToDate => (last_date - jan_first(last_date)).num_days(),
        }
    }
}

/// January 1st of the year `date` falls in
pub(crate) fn jan_first(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Change over one horizon. All-`None` fields mean the horizon could not
/// be computed; `is_actual_observation` distinguishes a well-matched
/// reference point from a degraded fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub reference_price: Option<f64>,
    pub reference_date: Option<NaiveDate>,
    pub absolute_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub is_actual_observation: bool,
}

/// Full change report for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub last_price: Option<f64>,
    pub last_date: Option<NaiveDate>,
    pub frequency_class: FrequencyClass,
    pub mean_gap_days: Option<f64>,
    /// Frequency-appropriate previous observation used for the headline
    /// "since last print" figure
    pub previous_price: Option<f64>,
    pub recent_change: Option<f64>,
    pub recent_change_pct: Option<f64>,
    pub day: PeriodChange,
    pub week: PeriodChange,
    pub month: PeriodChange,
    pub year: PeriodChange,
    pub ytd: PeriodChange,
    /// Horizon native to the series' sampling cadence
    pub best_display_period: Option<Horizon>,
}

impl ChangeSummary {
    /// Soft-failure form returned for empty or singleton series
    pub fn empty() -> Self {
        Self {
            last_price: None,
            last_date: None,
            frequency_class: FrequencyClass::Unknown,
            mean_gap_days: None,
            previous_price: None,
            recent_change: None,
            recent_change_pct: None,
            day: PeriodChange::default(),
            week: PeriodChange::default(),
            month: PeriodChange::default(),
            year: PeriodChange::default(),
            ytd: PeriodChange::default(),
            best_display_period: None,
        }
    }

    pub fn period(&self, horizon: Horizon) -> &PeriodChange {
        match horizon {
            Horizon::Day => &self.day,
            Horizon::Week => &self.week,
            Horizon::Month => &self.month,
            Horizon::Year => &self.year,
            Horizon::YearToDate => &self.ytd,
        }
    }
}
