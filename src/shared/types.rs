//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Commodity grouping used by the dashboard filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Strategic,
    Industry,
    Additional,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Strategic => "strategic",
            Category::Industry => "industry",
            Category::Additional => "additional",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Core => "Commodities central to our business",
            Category::Strategic => "Commodities in our strategic scenarios",
            Category::Industry => "Commodities important to our industry position",
            Category::Additional => "Additional commodities",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "core" => Some(Category::Core),
            "strategic" => Some(Category::Strategic),
            "industry" => Some(Category::Industry),
            "additional" => Some(Category::Additional),
            _ => None,
        }
    }
}

/// Sampling frequency requested from the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            _ => None,
        }
    }

    /// Default lookback when the caller gives no start date. Coarser data
    /// needs a longer window to yield enough points.
    pub fn default_lookback_days(&self) -> i64 {
        match self {
            Frequency::Daily => 365,
            Frequency::Weekly => 730,
            Frequency::Monthly => 3650,
        }
    }
}

/// Chart/fetch window selectable in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::SixMonths => "6M",
            Timeframe::OneYear => "1Y",
            Timeframe::FiveYears => "5Y",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "1M" => Some(Timeframe::OneMonth),
            "3M" => Some(Timeframe::ThreeMonths),
            "6M" => Some(Timeframe::SixMonths),
            "1Y" => Some(Timeframe::OneYear),
            "5Y" => Some(Timeframe::FiveYears),
            _ => None,
        }
    }

    pub fn lookback_days(&self) -> i64 {
        match self {
            Timeframe::OneMonth => 30,
            Timeframe::ThreeMonths => 91,
            Timeframe::SixMonths => 182,
            Timeframe::OneYear => 365,
            Timeframe::FiveYears => 1826,
        }
    }
}

/// One instrument tracked by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub name: String,
    pub category: Category,
    pub preferred_ticker: Option<String>,
    pub description: String,
    #[serde(default)]
    pub alternative_ticker: Option<String>,
    #[serde(default)]
    pub alternative_description: Option<String>,
    /// Quote type, e.g. "Spot (LME Cash)" or "Futures"
    pub kind: String,
    pub units: String,
    pub data_source: String,
}

impl Commodity {
    /// Ticker to try first: preferred, then alternative.
    pub fn primary_ticker(&self) -> Option<&str> {
        self.preferred_ticker
            .as_deref()
            .or(self.alternative_ticker.as_deref())
    }
}

/// Filter settings applied to a dashboard data load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchFilters {
    pub category: Option<Category>,
    pub timeframe: Timeframe,
    pub frequency: Frequency,
}

impl Default for FetchFilters {
    fn default() -> Self {
        Self {
            category: None,
            timeframe: Timeframe::OneYear,
            frequency: Frequency::Monthly,
        }
    }
}
