//! HTTP request handlers for the query API.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use logview_core::{LogRecord, RetrievalError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ServerResult;
use crate::params::LogsParams;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the store answers, `"degraded"` otherwise.
    pub status: String,
    /// Whether the store answered a ping.
    pub store: bool,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
}

/// Handle GET /api/health - health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state
        .with_retriever(|r| r.store().ping().map_err(RetrievalError::from))
        .await
        .is_ok();

    Json(HealthResponse {
        status: if store { "ok" } else { "degraded" }.to_string(),
        store,
        uptime_secs: state.uptime_secs(),
    })
}

/// Handle GET /api/logs - query stored logs.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogsParams>,
) -> ServerResult<Json<Vec<LogRecord>>> {
    let criteria = params.to_criteria(Utc::now(), &state.config().server)?;
    debug!(query = ?criteria.query, limit = criteria.limit, "log query");

    let records = state.with_retriever(move |r| r.query(&criteria)).await?;
    Ok(Json(records))
}

/// Handle GET /api/log-levels - levels with stored records.
pub async fn get_log_levels(State(state): State<Arc<AppState>>) -> Json<BTreeSet<String>> {
    match state.with_retriever(|r| r.get_available_log_levels()).await {
        Ok(levels) => Json(levels),
        Err(e) => {
            warn!(error = %e, "level discovery failed, using defaults");
            Json(state.config().discovery.levels.clone())
        }
    }
}

/// Handle GET /api/services - services with stored records.
pub async fn get_services(State(state): State<Arc<AppState>>) -> Json<BTreeSet<String>> {
    match state.with_retriever(|r| r.get_available_services()).await {
        Ok(services) => Json(services),
        Err(e) => {
            warn!(error = %e, "service discovery failed, using defaults");
            Json(state.config().discovery.services.clone())
        }
    }
}
