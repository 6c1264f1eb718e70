//! Dashboard JSON API.
//!
//! Serves the computed overview to a browser UI; chart rendering itself
//! stays on the client side.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::DashboardService;
use crate::config::Config;
use crate::domain::changes::ChangeSummary;
use crate::domain::validation::{ValidationResult, ValidationSummary};
use crate::presentation::CommodityCard;
use crate::shared::errors::AppError;
use crate::shared::types::{Commodity, FetchFilters};

/// Everything the API serves, computed once at startup
#[derive(Debug, Serialize)]
pub struct DashboardState {
    pub title: String,
    pub subtitle: String,
    pub loaded_at: DateTime<Utc>,
    pub catalog: Vec<Commodity>,
    pub cards: Vec<CommodityCard>,
    pub summaries: BTreeMap<String, ChangeSummary>,
    pub validation_results: BTreeMap<String, ValidationResult>,
    pub validation_summary: ValidationSummary,
}

impl DashboardState {
    pub async fn load(
        config: &Config,
        service: &DashboardService,
        filters: &FetchFilters,
    ) -> Self {
        let data = service.load_all(filters).await;
        let (validation_results, validation_summary) = service.validate_all(&data);

        Self {
            title: config.dashboard.title.clone(),
            subtitle: config.dashboard.subtitle.clone(),
            loaded_at: Utc::now(),
            catalog: config.commodities.clone(),
            cards: service.overview_cards(&data),
            summaries: service.summaries(&data),
            validation_results,
            validation_summary,
        }
    }
}

async fn health(State(state): State<Arc<DashboardState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
        "loaded_at": state.loaded_at,
        "commodities": state.cards.len(),
    }))
}

async fn commodities(State(state): State<Arc<DashboardState>>) -> Json<Vec<Commodity>> {
    Json(state.catalog.clone())
}

async fn overview(State(state): State<Arc<DashboardState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": state.title,
        "subtitle": state.subtitle,
        "loaded_at": state.loaded_at,
        "cards": state.cards,
    }))
}

async fn changes(
    State(state): State<Arc<DashboardState>>,
    Path(name): Path<String>,
) -> Result<Json<ChangeSummary>, StatusCode> {
    state
        .summaries
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn validation(State(state): State<Arc<DashboardState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "summary": state.validation_summary,
        "results": state.validation_results,
    }))
}

pub fn router(state: Arc<DashboardState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/commodities", get(commodities))
        .route("/api/overview", get(overview))
        .route("/api/changes/:name", get(changes))
        .route("/api/validation", get(validation))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: Arc<DashboardState>, port: u16) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    info!("comdash v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_catalog;
    use crate::infrastructure::market_data::SyntheticSource;

    async fn state() -> Arc<DashboardState> {
        let config = Config::default();
        let source = Arc::new(SyntheticSource::new(default_catalog(), 42));
        let service = DashboardService::new(source, config.commodities.clone());
        Arc::new(DashboardState::load(&config, &service, &FetchFilters::default()).await)
    }

    #[tokio::test]
    async fn test_state_carries_full_catalog() {
        let state = state().await;
        assert_eq!(state.catalog.len(), 21);
        // Every commodity loads from the synthetic source.
        assert_eq!(state.cards.len(), 21);
        assert_eq!(state.summaries.len(), 21);
        assert_eq!(state.validation_summary.total, 21);
    }

    #[tokio::test]
    async fn test_changes_lookup() {
        let state = state().await;

        let found = changes(State(state.clone()), Path("Copper (Cu)".to_string())).await;
        assert!(found.is_ok());

        let missing = changes(State(state), Path("Unobtainium".to_string())).await;
        assert!(matches!(missing, Err(StatusCode::NOT_FOUND)));
    }

    #[tokio::test]
    async fn test_router_builds() {
        let _ = router(state().await);
    }
}
