//! Source selection and layering

use std::sync::Arc;
use tracing::{info, warn};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{MarketDataSource, SyntheticSource, TerminalClient};
use crate::config::SourceCfg;
use crate::domain::series::PriceSeries;
use crate::shared::errors::MarketDataError;
use crate::shared::types::{Commodity, Frequency};

/// Tries a primary source and falls back to a secondary one when the
/// primary errors or comes back empty
pub struct FallbackSource {
    primary: Arc<dyn MarketDataSource>,
    fallback: Arc<dyn MarketDataSource>,
}

impl FallbackSource {
    pub fn new(primary: Arc<dyn MarketDataSource>, fallback: Arc<dyn MarketDataSource>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl MarketDataSource for FallbackSource {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    async fn historical_series(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        frequency: Frequency,
    ) -> Result<PriceSeries, MarketDataError> {
        match self
            .primary
            .historical_series(ticker, start, end, frequency)
            .await
        {
            Ok(series) if !series.is_empty() => Ok(series),
            Ok(_) => {
                warn!(
                    ticker,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    "primary source returned no data, using fallback"
                );
                self.fallback
                    .historical_series(ticker, start, end, frequency)
                    .await
            }
            Err(e) => {
                warn!(
                    ticker,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "primary source failed, using fallback"
                );
                self.fallback
                    .historical_series(ticker, start, end, frequency)
                    .await
            }
        }
    }
}

/// Build the market data source for the given configuration: the
/// terminal when an endpoint is configured (optionally shielded by the
/// synthetic fallback), synthetic data otherwise.
pub fn source_for(
    cfg: &SourceCfg,
    catalog: &[Commodity],
) -> Result<Arc<dyn MarketDataSource>, MarketDataError> {
    let synthetic = || Arc::new(SyntheticSource::new(catalog.to_vec(), cfg.seed));

    match &cfg.endpoint {
        Some(endpoint) => {
            let terminal = Arc::new(TerminalClient::new(endpoint, cfg.timeout_secs)?);
            if cfg.synthetic_fallback {
                info!(endpoint, "using terminal source with synthetic fallback");
                Ok(Arc::new(FallbackSource::new(terminal, synthetic())))
            } else {
                info!(endpoint, "using terminal source");
                Ok(terminal)
            }
        }
        None if cfg.synthetic_fallback => {
            info!("no terminal endpoint configured, using synthetic data");
            Ok(synthetic())
        }
        None => Err(MarketDataError::NoSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;

    struct FailingSource;

    #[async_trait]
    impl MarketDataSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn historical_series(
            &self,
            _ticker: &str,
            _start: Option<NaiveDate>,
            _end: Option<NaiveDate>,
            _frequency: Frequency,
        ) -> Result<PriceSeries, MarketDataError> {
            Err(MarketDataError::RequestFailed("connection refused".into()))
        }
    }

    struct FixedSource(PriceSeries);

    #[async_trait]
    impl MarketDataSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn historical_series(
            &self,
            _ticker: &str,
            _start: Option<NaiveDate>,
            _end: Option<NaiveDate>,
            _frequency: Frequency,
        ) -> Result<PriceSeries, MarketDataError> {
            Ok(self.0.clone())
        }
    }

    fn one_point() -> PriceSeries {
        PriceSeries::from_points(vec![PricePoint::new(
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            100.0,
        )])
    }

    #[tokio::test]
    async fn test_fallback_on_error() {
        let source = FallbackSource::new(
            Arc::new(FailingSource),
            Arc::new(FixedSource(one_point())),
        );

        let series = source
            .historical_series("X", None, None, Frequency::Daily)
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_empty() {
        let source = FallbackSource::new(
            Arc::new(FixedSource(PriceSeries::new())),
            Arc::new(FixedSource(one_point())),
        );

        let series = source
            .historical_series("X", None, None, Frequency::Daily)
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
    }

    #[tokio::test]
    async fn test_primary_wins_when_it_has_data() {
        let mut two = one_point();
        two.push(PricePoint::new(
            NaiveDate::from_ymd_opt(2024, 6, 29).unwrap(),
            101.0,
        ));

        let source = FallbackSource::new(
            Arc::new(FixedSource(two.clone())),
            Arc::new(FixedSource(one_point())),
        );

        let series = source
            .historical_series("X", None, None, Frequency::Daily)
            .await
            .unwrap();
        assert_eq!(series, two);
    }

    #[test]
    fn test_source_for_requires_some_source() {
        let cfg = SourceCfg {
            endpoint: None,
            timeout_secs: 30,
            synthetic_fallback: false,
            seed: 42,
        };
        assert!(matches!(
            source_for(&cfg, &[]),
            Err(MarketDataError::NoSource)
        ));
    }

    #[test]
    fn test_source_for_synthetic_by_default() {
        let cfg = SourceCfg::default();
        let source = source_for(&cfg, &[]).unwrap();
        assert_eq!(source.name(), "synthetic");
    }
}
