use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use lernprofil::error::AppError;
use lernprofil::ingest::ResponseImporter;
use lernprofil::scoring::{compute_profile, Profile, ResponseMap};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use tracing::info;

/// Answers for one respondent, either as a code → rating object or as the
/// raw `item_code,rating` CSV export.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRequest {
    #[serde(default)]
    pub(crate) profile_id: Option<String>,
    #[serde(default)]
    pub(crate) responses: Option<ResponseMap>,
    #[serde(default)]
    pub(crate) csv: Option<String>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/profile", post(profile_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn profile_endpoint(
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let ProfileRequest {
        profile_id,
        responses,
        csv,
    } = payload;

    let profile = tokio::task::spawn_blocking(move || -> Result<Profile, AppError> {
        let responses = match (responses, csv) {
            (Some(responses), None) => responses,
            (None, Some(csv)) => ResponseImporter::from_reader(Cursor::new(csv.into_bytes()))?,
            (Some(_), Some(_)) => {
                return Err(AppError::InvalidRequest(
                    "provide either `responses` or `csv`, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::InvalidRequest(
                    "one of `responses` or `csv` is required".to_string(),
                ))
            }
        };
        Ok(compute_profile(&responses, profile_id.as_deref())?)
    })
    .await
    .map_err(axum::Error::new)??;

    info!(
        profile_id = %profile.profile_id,
        quality = profile.response_quality.quality_flag.label(),
        "profile scored via api"
    );
    Ok(Json(profile))
}
