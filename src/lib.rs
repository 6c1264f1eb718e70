//! Comdash - commodity price dashboard
//! Built with Domain-Driven Design principles

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;
pub mod shared;

// Re-export main types for convenience
pub use application::DashboardService;
pub use domain::changes::{compute_changes, ChangeSummary, Horizon, PeriodChange};
pub use domain::series::{detect_frequency, normalize, FrequencyClass, PricePoint, PriceSeries};
pub use domain::validation::{DataValidator, ValidationResult, ValidationSummary};
pub use infrastructure::market_data::MarketDataSource;
pub use presentation::CommodityCard;
