//! CLI commands and handlers

use chrono::Utc;
use clap::Subcommand;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domain::changes::Horizon;
use crate::infrastructure::market_data::source_for;
use crate::infrastructure::snapshot::DataLogger;
use crate::presentation::{format_price, freshness_text};
use crate::server;
use crate::shared::errors::AppError;
use crate::shared::types::{Category, FetchFilters, Frequency, Timeframe};

use super::services::DashboardService;

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all commodities and render the dashboard cards
    Overview {
        /// Filter by category (core, strategic, industry, additional)
        #[arg(short, long)]
        category: Option<String>,

        /// Fetch window (1M, 3M, 6M, 1Y, 5Y)
        #[arg(short, long)]
        timeframe: Option<String>,

        /// Sampling frequency (daily, weekly, monthly)
        #[arg(short, long)]
        frequency: Option<String>,
    },

    /// Show the full period-change table for one commodity
    Changes {
        /// Commodity name, e.g. "Copper (Cu)"
        commodity: String,

        /// Sampling frequency (daily, weekly, monthly)
        #[arg(short, long)]
        frequency: Option<String>,
    },

    /// Run the data quality checks across all commodities
    Validate {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Fetch everything and persist JSON/CSV snapshot artifacts
    Snapshot,

    /// Serve the dashboard JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, config: Config) -> Result<(), AppError> {
        match command {
            Commands::Overview {
                category,
                timeframe,
                frequency,
            } => {
                let filters = build_filters(&config, category, timeframe, frequency)?;
                Self::execute_overview(config, filters).await
            }
            Commands::Changes {
                commodity,
                frequency,
            } => {
                let filters = build_filters(&config, None, None, frequency)?;
                Self::execute_changes(config, commodity, filters).await
            }
            Commands::Validate { category } => {
                let filters = build_filters(&config, category, None, None)?;
                Self::execute_validate(config, filters).await
            }
            Commands::Snapshot => {
                let filters = build_filters(&config, None, None, None)?;
                Self::execute_snapshot(config, filters).await
            }
            Commands::Serve { port } => Self::execute_serve(config, port).await,
        }
    }

    async fn execute_overview(config: Config, filters: FetchFilters) -> Result<(), AppError> {
        let service = build_service(&config)?;
        let data = service.load_all(&filters).await;
        let cards = service.overview_cards(&data);

        println!("\n{}", config.dashboard.title);
        println!("{}\n", config.dashboard.subtitle);

        if cards.is_empty() {
            println!("No data available for the selected filters.");
            return Ok(());
        }

        for card in &cards {
            let price = card.last_price.as_deref().unwrap_or("-");
            println!(
                "{} [{}] {} {}",
                card.name,
                card.category.as_str(),
                price,
                card.units
            );

            for change in &card.changes {
                let marker = if change.is_best { ">" } else { " " };
                println!("  {} {:>3}: {}", marker, change.horizon.label(), change.text);
            }

            if let Some(series) = data.get(&card.name) {
                println!("    {}", freshness_text(series, Utc::now().date_naive()));
            }
            println!();
        }

        println!("* change computed from a degraded reference point");
        Ok(())
    }

    async fn execute_changes(
        config: Config,
        commodity: String,
        filters: FetchFilters,
    ) -> Result<(), AppError> {
        let descriptor = config
            .commodity(&commodity)
            .cloned()
            .ok_or_else(|| AppError::UnknownCommodity(commodity.clone()))?;

        let service = build_service(&config)?;
        let data = service.load_all(&filters).await;
        let series = data
            .get(&commodity)
            .ok_or_else(|| AppError::MarketDataError(format!("no data for {}", commodity)))?;

        let summary = crate::domain::changes::compute_changes(series);

        println!("\n{} ({})", descriptor.name, descriptor.units);
        if let (Some(price), Some(date)) = (summary.last_price, summary.last_date) {
            println!(
                "Last: {} on {}",
                format_price(price, &descriptor.units),
                date
            );
        }
        println!(
            "Frequency: {} (mean gap {:.1} days), best period: {}",
            summary.frequency_class.as_str(),
            summary.mean_gap_days.unwrap_or(0.0),
            summary
                .best_display_period
                .map(|h| h.label())
                .unwrap_or("-")
        );

        println!("\n{:>4}  {:>12}  {:>12}  {:>10}  {}", "", "reference", "date", "change", "pct");
        for horizon in Horizon::ALL {
            let p = summary.period(horizon);
            println!(
                "{:>4}  {:>12}  {:>12}  {:>10}  {}{}",
                horizon.label(),
                p.reference_price
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".to_string()),
                p.reference_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                p.absolute_change
                    .map(|v| format!("{:+.2}", v))
                    .unwrap_or_else(|| "-".to_string()),
                p.percent_change
                    .map(|v| format!("{:+.2}%", v * 100.0))
                    .unwrap_or_else(|| "-".to_string()),
                if p.is_actual_observation { "" } else { " *" }
            );
        }

        Ok(())
    }

    async fn execute_validate(config: Config, filters: FetchFilters) -> Result<(), AppError> {
        let service = build_service(&config)?;
        let data = service.load_all(&filters).await;
        let (results, summary) = service.validate_all(&data);

        println!("\nData quality report");
        println!(
            "  {} commodities, {} valid, {} with issues",
            summary.total, summary.valid_count, summary.invalid_count
        );

        for (name, result) in &results {
            if result.is_valid {
                continue;
            }
            println!("\n  {}:", name);
            for issue in &result.issues {
                println!("    - {}", issue);
            }
        }

        if summary.invalid_count == 0 {
            println!("\nAll series passed the quality checks.");
        }

        Ok(())
    }

    async fn execute_snapshot(config: Config, filters: FetchFilters) -> Result<(), AppError> {
        let service = build_service(&config)?;
        let logger = DataLogger::new(&config.logging.log_dir)?;

        let data = service.load_all(&filters).await;
        let (results, summary) = service.validate_all(&data);
        let summaries = service.summaries(&data);

        let now = Utc::now();
        let validation_path = logger.log_validation_results(&results, now)?;
        let capture_dir = logger.capture_data_snapshot(&data, Some(&filters), now)?;
        for (name, change_summary) in &summaries {
            logger.log_price_comparison(name, change_summary, now)?;
        }

        info!(
            validation = %validation_path.display(),
            capture = %capture_dir.display(),
            "snapshot complete"
        );
        println!(
            "Snapshot written: {} commodities, {} valid ({} issues logged)",
            summary.total, summary.valid_count, summary.invalid_count
        );
        println!("  validation: {}", validation_path.display());
        println!("  capture:    {}", capture_dir.display());

        Ok(())
    }

    async fn execute_serve(config: Config, port: u16) -> Result<(), AppError> {
        let service = build_service(&config)?;
        let filters = FetchFilters {
            category: None,
            timeframe: config.dashboard.default_timeframe,
            frequency: config.dashboard.default_frequency,
        };

        let state = server::DashboardState::load(&config, &service, &filters).await;
        server::serve(Arc::new(state), port).await
    }
}

fn build_service(config: &Config) -> Result<DashboardService, AppError> {
    let source = source_for(&config.source, &config.commodities)?;
    Ok(DashboardService::new(source, config.commodities.clone()))
}

fn build_filters(
    config: &Config,
    category: Option<String>,
    timeframe: Option<String>,
    frequency: Option<String>,
) -> Result<FetchFilters, AppError> {
    let category = match category {
        Some(raw) => Some(
            Category::parse(&raw)
                .ok_or_else(|| AppError::ConfigError(format!("unknown category: {}", raw)))?,
        ),
        None => None,
    };

    let timeframe = match timeframe {
        Some(raw) => Timeframe::parse(&raw)
            .ok_or_else(|| AppError::ConfigError(format!("unknown timeframe: {}", raw)))?,
        None => config.dashboard.default_timeframe,
    };

    let frequency = match frequency {
        Some(raw) => Frequency::parse(&raw)
            .ok_or_else(|| AppError::ConfigError(format!("unknown frequency: {}", raw)))?,
        None => config.dashboard.default_frequency,
    };

    Ok(FetchFilters {
        category,
        timeframe,
        frequency,
    })
}
