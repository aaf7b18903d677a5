use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use tokio::task::spawn_blocking;

use crate::error::AppError;
use crate::infra::AppContext;
use crate::workflows::registration::{
    RegistrationId, RegistrationRecord, RegistrationStatus, WorkshopId,
    WorkshopRegistrationSummary,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChangeRequest {
    pub(crate) status: String,
}

/// Registration API. Workflows block on their repos, so every handler hops onto the
/// blocking pool.
pub(crate) fn registration_router(context: AppContext) -> Router {
    Router::new()
        .route("/api/v1/workshops", get(list_workshops_handler))
        .route(
            "/api/v1/workshops/:workshop_id/registrations",
            get(list_registrations_handler),
        )
        .route(
            "/api/v1/workshops/:workshop_id/registrations/:registration_id/status",
            put(change_status_handler),
        )
        .with_state(context)
}

pub(crate) fn with_registration_routes(context: AppContext) -> Router {
    registration_router(context)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_workshops_handler(
    State(context): State<AppContext>,
) -> Result<Json<Vec<WorkshopRegistrationSummary>>, AppError> {
    let summaries = spawn_blocking(move || {
        context
            .list_workshops_workflow()
            .summarize_upcoming_workshops()
    })
    .await??;
    Ok(Json(summaries))
}

pub(crate) async fn list_registrations_handler(
    State(context): State<AppContext>,
    Path(workshop_id): Path<String>,
) -> Result<Json<Vec<RegistrationRecord>>, AppError> {
    let workshop_id = WorkshopId(workshop_id);
    let registrations =
        spawn_blocking(move || context.registrant_workflows().registrants(&workshop_id)).await??;
    Ok(Json(registrations))
}

pub(crate) async fn change_status_handler(
    State(context): State<AppContext>,
    Path((workshop_id, registration_id)): Path<(String, String)>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<StatusCode, AppError> {
    let new_status: RegistrationStatus = request.status.parse()?;
    let workshop_id = WorkshopId(workshop_id);
    let registration_id = RegistrationId(registration_id);

    spawn_blocking(move || {
        context.registrant_workflows().update_registration_status(
            &registration_id,
            &workshop_id,
            new_status,
        )
    })
    .await??;
    Ok(StatusCode::NO_CONTENT)
}
