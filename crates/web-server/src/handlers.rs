use crate::{AppState, error::AppError};
use api_client::error::ApiError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use core_types::{
    Adjustments, CalculationResults, DateRange, LiveMetrics, Metrics, Scenario, ScenarioComparison,
};
use export::ExportFormat;
use scenario_store::SessionSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub days: Option<u32>,
}

impl MetricsQuery {
    /// An explicit window wins over `days`; `days` falls back to `default_days`.
    pub fn resolve(&self, default_days: u32, now: DateTime<Utc>) -> Result<DateRange, AppError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                DateRange::new(start, end).map_err(|e| AppError::BadRequest(e.to_string()))
            }
            (None, None) => Ok(DateRange::last_days(self.days.unwrap_or(default_days), now)),
            _ => Err(AppError::BadRequest(
                "startDate and endDate must be given together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub success: bool,
    pub shop: String,
    pub metrics: LiveMetrics,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub adjustments: Adjustments,
    /// Overrides the baseline built from the last fetched metrics.
    pub baseline: Option<Metrics>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub scenarios: Vec<Adjustments>,
    pub baseline: Option<Metrics>,
}

#[derive(Debug, Deserialize)]
pub struct SaveScenarioRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub adjustments: Adjustments,
    pub baseline: Option<Metrics>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

async fn resolve_baseline(state: &AppState, explicit: Option<Metrics>) -> Result<Metrics, AppError> {
    match explicit {
        Some(baseline) => Ok(baseline),
        None => Ok(state.session.lock().await.baseline(state.defaults)?),
    }
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # GET /api/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.session.lock().await.snapshot())
}

/// # GET /api/metrics
/// Fetches live metrics for the requested window. A repeated request for the
/// window already loaded is answered from the session without calling Shopify.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>, AppError> {
    let range = query.resolve(state.default_days, Utc::now())?;
    let provider = state
        .provider
        .clone()
        .ok_or(AppError::Provider(ApiError::NotConfigured))?;
    let shop = provider.store();

    {
        let mut session = state.session.lock().await;
        if !session.begin_fetch(range) {
            if let Some(metrics) = session.metrics.clone() {
                return Ok(Json(MetricsResponse {
                    success: true,
                    shop: shop.domain,
                    metrics,
                }));
            }
        }
    }

    // The session lock is not held across the network call.
    match provider.fetch_metrics(&range).await {
        Ok(metrics) => {
            let stored = state
                .session
                .lock()
                .await
                .complete_fetch(range, shop.clone(), metrics.clone());
            if !stored {
                tracing::info!(range = %range.key(), "A newer window was selected, discarding fetched metrics.");
            }
            Ok(Json(MetricsResponse {
                success: true,
                shop: shop.domain,
                metrics,
            }))
        }
        Err(e) => {
            if !state.session.lock().await.fail_fetch(range, e.to_string()) {
                tracing::info!(range = %range.key(), "A newer window was selected, ignoring failed fetch.");
            }
            Err(e.into())
        }
    }
}

/// # POST /api/simulate
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<CalculationResults>, AppError> {
    let baseline = resolve_baseline(&state, request.baseline).await?;
    Ok(Json(calculator::project(&baseline, &request.adjustments)))
}

/// # POST /api/compare
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Vec<ScenarioComparison>>, AppError> {
    let baseline = resolve_baseline(&state, request.baseline).await?;
    Ok(Json(calculator::compare_scenarios(&baseline, &request.scenarios)))
}

/// # GET /api/scenarios
pub async fn list_scenarios(State(state): State<Arc<AppState>>) -> Json<Vec<Scenario>> {
    Json(state.session.lock().await.scenarios.list())
}

/// # POST /api/scenarios
/// Projects the adjustments and saves the result. The oldest scenario is
/// evicted once the store is full.
pub async fn save_scenario(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveScenarioRequest>,
) -> Result<(StatusCode, Json<Scenario>), AppError> {
    let baseline = resolve_baseline(&state, request.baseline).await?;
    let results = calculator::project(&baseline, &request.adjustments);
    let scenario = Scenario::new(request.name.as_deref(), request.adjustments, results, Utc::now());

    if let Some(evicted) = state.session.lock().await.scenarios.add(scenario.clone()) {
        tracing::info!(evicted = %evicted.name, "Scenario store full, dropped the oldest entry.");
    }
    tracing::info!(id = %scenario.id, name = %scenario.name, "Saved scenario.");

    Ok((StatusCode::CREATED, Json(scenario)))
}

/// # DELETE /api/scenarios/:id
pub async fn delete_scenario(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.session.lock().await.scenarios.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// # DELETE /api/scenarios
pub async fn clear_scenarios(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.lock().await.scenarios.clear();
    StatusCode::NO_CONTENT
}

/// # GET /api/scenarios/export?format=json|csv
pub async fn export_scenarios(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>().map_err(AppError::BadRequest)?,
        None => ExportFormat::default(),
    };

    let scenarios = state.session.lock().await.scenarios.list();
    let body = export::export(&scenarios, format)?;
    let file_name = export::export_file_name(format, Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}
