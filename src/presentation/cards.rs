//! Dashboard card assembly from change summaries

use serde::{Deserialize, Serialize};

use super::format::{format_change, format_price, ColorClass};
use crate::domain::changes::{ChangeSummary, Horizon};
use crate::domain::series::FrequencyClass;
use crate::shared::types::{Category, Commodity};

/// One formatted change row on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardChange {
    pub horizon: Horizon,
    pub text: String,
    pub color: ColorClass,
    pub is_actual: bool,
    /// Whether this horizon matches the series' sampling cadence
    pub is_best: bool,
}

/// Display-ready view of one commodity, consumed by the terminal
/// renderer and the HTTP API alike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityCard {
    pub name: String,
    pub category: Category,
    pub kind: String,
    pub units: String,
    pub data_source: String,
    pub last_price: Option<String>,
    pub last_date: Option<chrono::NaiveDate>,
    pub frequency: FrequencyClass,
    pub best_display_period: Option<Horizon>,
    pub changes: Vec<CardChange>,
}

impl CommodityCard {
    pub fn build(commodity: &Commodity, summary: &ChangeSummary) -> Self {
        let changes = Horizon::ALL
            .iter()
            .map(|&horizon| {
                let period = summary.period(horizon);
                let (text, color) = format_change(
                    period.absolute_change,
                    period.percent_change,
                    period.is_actual_observation,
                );
                CardChange {
                    horizon,
                    text,
                    color,
                    is_actual: period.is_actual_observation,
                    is_best: summary.best_display_period == Some(horizon),
                }
            })
            .collect();

        Self {
            name: commodity.name.clone(),
            category: commodity.category,
            kind: commodity.kind.clone(),
            units: commodity.units.clone(),
            data_source: commodity.data_source.clone(),
            last_price: summary
                .last_price
                .map(|p| format_price(p, &commodity.units)),
            last_date: summary.last_date,
            frequency: summary.frequency_class,
            best_display_period: summary.best_display_period,
            changes,
        }
    }

    /// The change row for the horizon native to this series, if any
    pub fn headline_change(&self) -> Option<&CardChange> {
        self.changes.iter().find(|c| c.is_best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::changes::compute_changes;
    use crate::domain::series::{PricePoint, PriceSeries};
    use chrono::{Duration, NaiveDate};

    fn copper() -> Commodity {
        Commodity {
            name: "Copper (Cu)".to_string(),
            category: Category::Core,
            preferred_ticker: Some("LMCADY Comdty".to_string()),
            description: "LME Copper Cash Settlement Price".to_string(),
            alternative_ticker: None,
            alternative_description: None,
            kind: "Spot (LME Cash)".to_string(),
            units: "USD/MT".to_string(),
            data_source: "Terminal".to_string(),
        }
    }

    #[test]
    fn test_card_from_daily_series() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let points = (0..400)
            .rev()
            .map(|back| PricePoint::new(end - Duration::days(back), 9000.0 + back as f64))
            .collect();
        let summary = compute_changes(&PriceSeries::from_points(points));

        let card = CommodityCard::build(&copper(), &summary);
        assert_eq!(card.last_price.as_deref(), Some("$9,000.00"));
        assert_eq!(card.best_display_period, Some(Horizon::Day));
        assert_eq!(card.changes.len(), 5);

        let headline = card.headline_change().unwrap();
        assert_eq!(headline.horizon, Horizon::Day);
        assert!(headline.is_actual);
    }

    #[test]
    fn test_card_from_empty_series() {
        let summary = compute_changes(&PriceSeries::new());
        let card = CommodityCard::build(&copper(), &summary);

        assert!(card.last_price.is_none());
        assert!(card.best_display_period.is_none());
        assert!(card.headline_change().is_none());
        assert!(card.changes.iter().all(|c| c.text == "No data available"));
    }
}
