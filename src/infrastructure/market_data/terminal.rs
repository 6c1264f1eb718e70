//! HTTP client for a market-data terminal sidecar.
//!
//! The terminal gateway exposes historical prices as JSON:
//! `GET {base}/v1/history?ticker=..&start=..&end=..&periodicity=..`
//! with `observations` as parallel date/value rows, values possibly null
//! on non-trading days.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use super::MarketDataSource;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::shared::errors::MarketDataError;
use crate::shared::types::Frequency;

/// Window used for the retry after a full-range request fails
const RETRY_LOOKBACK_DAYS: i64 = 90;

/// Terminal gateway response structures
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    observations: Option<Vec<Observation>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: NaiveDate,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Client for the terminal's history endpoint
#[derive(Debug, Clone)]
pub struct TerminalClient {
    base_url: String,
    client: reqwest::Client,
}

impl TerminalClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MarketDataError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate, freq: Frequency) -> String {
        format!(
            "{}/v1/history?ticker={}&start={}&end={}&periodicity={}",
            self.base_url,
            urlencode(ticker),
            start,
            end,
            freq.as_str()
        )
    }

    async fn fetch_text(&self, url: &str) -> Result<String, MarketDataError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::RequestFailed(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| MarketDataError::RequestFailed(e.to_string()))
    }

    /// Parse a terminal response into a series. Null observations are
    /// skipped; rows after `end` are dropped so a lagging gateway clock
    /// cannot introduce future dates.
    fn parse_response(json: &str, end: NaiveDate) -> Result<PriceSeries, MarketDataError> {
        let response: HistoryResponse =
            serde_json::from_str(json).map_err(|e| MarketDataError::ParseError(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(MarketDataError::ApiError {
                code: error.code,
                message: error.message,
            });
        }

        let observations = response.observations.unwrap_or_default();
        let points = observations
            .into_iter()
            .filter(|o| o.date <= end)
            .filter_map(|o| o.value.map(|value| PricePoint::new(o.date, value)))
            .collect();

        Ok(PriceSeries::from_points(points).normalized())
    }
}

#[async_trait]
impl MarketDataSource for TerminalClient {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn historical_series(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        frequency: Frequency,
    ) -> Result<PriceSeries, MarketDataError> {
        let end = end.unwrap_or_else(|| Utc::now().date_naive());
        let start = start
            .unwrap_or_else(|| end - chrono::Duration::days(frequency.default_lookback_days()));

        let url = self.build_url(ticker, start, end, frequency);
        info!(ticker, %start, %end, freq = frequency.as_str(), "fetching terminal history");

        let text = match self.fetch_text(&url).await {
            Ok(text) => text,
            Err(e) => {
                // One retry over a short window; long histories are the
                // usual cause of gateway timeouts.
                let retry_start = end - chrono::Duration::days(RETRY_LOOKBACK_DAYS);
                warn!(ticker, error = %e, "full-range fetch failed, retrying last {} days", RETRY_LOOKBACK_DAYS);
                let retry_url = self.build_url(ticker, retry_start, end, frequency);
                self.fetch_text(&retry_url).await?
            }
        };

        let series = Self::parse_response(&text, end)?;
        if series.is_empty() {
            warn!(ticker, "terminal returned no observations");
        }

        Ok(series)
    }
}

fn urlencode(s: &str) -> String {
    // Tickers contain spaces ("LMCADY Comdty") and little else exotic.
    s.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn client() -> TerminalClient {
        TerminalClient::new("http://localhost:8194/", 30).unwrap()
    }

    #[test]
    fn test_build_url() {
        let url = client().build_url(
            "LMCADY Comdty",
            d(2024, 1, 1),
            d(2024, 6, 28),
            Frequency::Daily,
        );

        assert!(url.starts_with("http://localhost:8194/v1/history?"));
        assert!(url.contains("ticker=LMCADY%20Comdty"));
        assert!(url.contains("start=2024-01-01"));
        assert!(url.contains("end=2024-06-28"));
        assert!(url.contains("periodicity=daily"));
    }

    #[test]
    fn test_parse_response_valid() {
        let json = r#"{"observations":[
            {"date":"2024-06-26","value":9400.0},
            {"date":"2024-06-27","value":9450.5},
            {"date":"2024-06-28","value":9452.0}
        ],"error":null}"#;

        let series = TerminalClient::parse_response(json, d(2024, 6, 28)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.points[1].price, 9450.5);
    }

    #[test]
    fn test_parse_response_skips_nulls() {
        let json = r#"{"observations":[
            {"date":"2024-06-26","value":9400.0},
            {"date":"2024-06-27","value":null},
            {"date":"2024-06-28","value":9452.0}
        ],"error":null}"#;

        let series = TerminalClient::parse_response(json, d(2024, 6, 28)).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_parse_response_drops_future_dates() {
        let json = r#"{"observations":[
            {"date":"2024-06-27","value":9450.5},
            {"date":"2024-07-15","value":9500.0}
        ],"error":null}"#;

        let series = TerminalClient::parse_response(json, d(2024, 6, 28)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].date, d(2024, 6, 27));
    }

    #[test]
    fn test_parse_response_api_error() {
        let json = r#"{"observations":null,"error":{"code":"NOT_FOUND","message":"unknown ticker"}}"#;
        let result = TerminalClient::parse_response(json, d(2024, 6, 28));
        assert!(matches!(result, Err(MarketDataError::ApiError { .. })));
    }

    #[test]
    fn test_parse_response_empty_payload_is_empty_series() {
        let json = r#"{"observations":[],"error":null}"#;
        let series = TerminalClient::parse_response(json, d(2024, 6, 28)).unwrap();
        assert!(series.is_empty());

        let json = r#"{"observations":null,"error":null}"#;
        let series = TerminalClient::parse_response(json, d(2024, 6, 28)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let result = TerminalClient::parse_response("not json", d(2024, 6, 28));
        assert!(matches!(result, Err(MarketDataError::ParseError(_))));
    }
}
