//! Market data infrastructure - vendor terminal access and fallbacks

mod factory;
mod synthetic;
mod terminal;

pub use factory::{source_for, FallbackSource};
pub use synthetic::SyntheticSource;
pub use terminal::TerminalClient;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::series::PriceSeries;
use crate::shared::errors::MarketDataError;
use crate::shared::types::Frequency;

/// Narrow contract to a historical price source.
///
/// Implementations are chosen at construction time and injected into the
/// dashboard service; the core never knows which vendor sits behind it.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Human-readable source name for logs and card metadata
    fn name(&self) -> &'static str;

    /// Fetch one ticker's history. `start`/`end` default to a
    /// frequency-appropriate lookback window ending today. An empty
    /// series is a valid answer (the ticker had no data), errors are
    /// reserved for transport and protocol failures.
    async fn historical_series(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        frequency: Frequency,
    ) -> Result<PriceSeries, MarketDataError>;
}
