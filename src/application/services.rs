//! Application services and use cases

use chrono::Utc;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::changes::{compute_changes, ChangeSummary};
use crate::domain::series::PriceSeries;
use crate::domain::validation::{DataValidator, ValidationResult, ValidationSummary};
use crate::infrastructure::market_data::MarketDataSource;
use crate::presentation::CommodityCard;
use crate::shared::types::{Commodity, FetchFilters};

/// Minimum number of points before the alternative ticker is worth trying
const MIN_USABLE_POINTS: usize = 10;

/// Orchestrates the dashboard pipeline: fetch series for the configured
/// catalog, validate them, and compute change summaries and cards.
pub struct DashboardService {
    source: Arc<dyn MarketDataSource>,
    validator: DataValidator,
    catalog: Vec<Commodity>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn MarketDataSource>, catalog: Vec<Commodity>) -> Self {
        Self {
            source,
            validator: DataValidator::new(),
            catalog,
        }
    }

    /// Replace the validator, mainly to pin its reference date in tests
    pub fn with_validator(mut self, validator: DataValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn catalog(&self) -> &[Commodity] {
        &self.catalog
    }

    fn filtered_catalog(&self, filters: &FetchFilters) -> Vec<&Commodity> {
        self.catalog
            .iter()
            .filter(|c| filters.category.map_or(true, |cat| c.category == cat))
            .collect()
    }

    /// Fetch history for every commodity matching the filters. Fetches
    /// run concurrently; a failed or empty commodity is logged and
    /// skipped so one bad ticker never sinks the batch.
    pub async fn load_all(&self, filters: &FetchFilters) -> BTreeMap<String, PriceSeries> {
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(filters.timeframe.lookback_days());
        let commodities = self.filtered_catalog(filters);

        info!(
            count = commodities.len(),
            timeframe = filters.timeframe.as_str(),
            frequency = filters.frequency.as_str(),
            "loading commodity data"
        );

        let fetches = commodities.iter().map(|commodity| async {
            let series = self.fetch_commodity(commodity, filters, start, end).await;
            (commodity.name.clone(), series)
        });

        let mut data = BTreeMap::new();
        for (name, series) in join_all(fetches).await {
            match series {
                Some(series) => {
                    data.insert(name, series);
                }
                None => warn!(commodity = %name, "no data, skipping"),
            }
        }

        info!(loaded = data.len(), "commodity data loaded");
        data
    }

    async fn fetch_commodity(
        &self,
        commodity: &Commodity,
        filters: &FetchFilters,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Option<PriceSeries> {
        // Tickerless instruments go to the source under their display
        // name; only the synthetic source will answer.
        let ticker = commodity.primary_ticker().unwrap_or(&commodity.name);

        let mut series = match self
            .source
            .historical_series(ticker, Some(start), Some(end), filters.frequency)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                error!(commodity = %commodity.name, ticker, error = %e, "fetch failed");
                PriceSeries::new()
            }
        };

        // A thin result may just be a stale preferred ticker; see if the
        // alternative has better coverage.
        if series.len() < MIN_USABLE_POINTS {
            if let Some(alt) = commodity.alternative_ticker.as_deref() {
                if Some(alt) != commodity.primary_ticker() {
                    info!(commodity = %commodity.name, alt, "trying alternative ticker");
                    match self
                        .source
                        .historical_series(alt, Some(start), Some(end), filters.frequency)
                        .await
                    {
                        Ok(alt_series) if alt_series.len() > series.len() => series = alt_series,
                        Ok(_) => {}
                        Err(e) => {
                            warn!(commodity = %commodity.name, alt, error = %e, "alternative fetch failed")
                        }
                    }
                }
            }
        }

        if series.is_empty() {
            None
        } else {
            Some(series)
        }
    }

    /// Change summaries for a loaded batch
    pub fn summaries(&self, data: &BTreeMap<String, PriceSeries>) -> BTreeMap<String, ChangeSummary> {
        data.iter()
            .map(|(name, series)| (name.clone(), compute_changes(series)))
            .collect()
    }

    /// Display cards in catalog order
    pub fn overview_cards(&self, data: &BTreeMap<String, PriceSeries>) -> Vec<CommodityCard> {
        self.catalog
            .iter()
            .filter_map(|commodity| {
                data.get(&commodity.name)
                    .map(|series| CommodityCard::build(commodity, &compute_changes(series)))
            })
            .collect()
    }

    /// Quality checks over a loaded batch
    pub fn validate_all(
        &self,
        data: &BTreeMap<String, PriceSeries>,
    ) -> (BTreeMap<String, ValidationResult>, ValidationSummary) {
        let results = self.validator.validate_all(data);
        let summary = DataValidator::summarize(&results);
        (results, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalog;
    use crate::domain::series::PricePoint;
    use crate::shared::errors::MarketDataError;
    use crate::shared::types::Frequency;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};

    /// Source with one good ticker, one failing ticker and a thin
    /// preferred ticker whose alternative is richer
    struct ScriptedSource;

    #[async_trait]
    impl MarketDataSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn historical_series(
            &self,
            ticker: &str,
            _start: Option<NaiveDate>,
            end: Option<NaiveDate>,
            _frequency: Frequency,
        ) -> Result<PriceSeries, MarketDataError> {
            let end = end.unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
            let series_of = |n: usize| {
                PriceSeries::from_points(
                    (0..n)
                        .rev()
                        .map(|i| PricePoint::new(end - Duration::days(i as i64), 100.0 + i as f64))
                        .collect(),
                )
            };

            match ticker {
                "LMCADY Comdty" => Ok(series_of(30)),
                "LJC1 Comdty" => Ok(series_of(3)),
                "LFA1 Comdty" => Ok(series_of(25)),
                "LMZSDY Comdty" => Err(MarketDataError::RequestFailed("boom".into())),
                _ => Ok(PriceSeries::new()),
            }
        }
    }

    fn service() -> DashboardService {
        let catalog: Vec<Commodity> = default_catalog()
            .into_iter()
            .filter(|c| {
                matches!(
                    c.name.as_str(),
                    "Copper (Cu)" | "Zinc (Zn)" | "Lithium (Li)"
                )
            })
            .collect();
        DashboardService::new(Arc::new(ScriptedSource), catalog)
    }

    #[tokio::test]
    async fn test_one_failure_does_not_sink_the_batch() {
        let data = service().load_all(&FetchFilters::default()).await;

        // Zinc fails, the others load.
        assert!(data.contains_key("Copper (Cu)"));
        assert!(data.contains_key("Lithium (Li)"));
        assert!(!data.contains_key("Zinc (Zn)"));
    }

    #[tokio::test]
    async fn test_alternative_ticker_used_when_preferred_is_thin() {
        let data = service().load_all(&FetchFilters::default()).await;
        // Lithium's preferred ticker has 3 points, the alternative 25.
        assert_eq!(data.get("Lithium (Li)").unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_cards_follow_catalog_order() {
        let svc = service();
        let data = svc.load_all(&FetchFilters::default()).await;
        let cards = svc.overview_cards(&data);

        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Copper (Cu)", "Lithium (Li)"]);
    }

    #[tokio::test]
    async fn test_validation_pipeline() {
        let svc = service();
        let data = svc.load_all(&FetchFilters::default()).await;
        let (results, summary) = svc.validate_all(&data);

        assert_eq!(summary.total, results.len());
        assert_eq!(summary.valid_count + summary.invalid_count, summary.total);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let svc = service();
        let filters = FetchFilters {
            category: Some(crate::shared::types::Category::Core),
            ..FetchFilters::default()
        };
        let data = svc.load_all(&filters).await;

        // Lithium is strategic and filtered out.
        assert!(data.contains_key("Copper (Cu)"));
        assert!(!data.contains_key("Lithium (Li)"));
    }
}
