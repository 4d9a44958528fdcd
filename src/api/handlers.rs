use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{error::AppResult, middleware::RequestId, models::JobId};

use super::{extract::RecommendationJson, AppState};

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Returns up to three matching job ids, best first
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RecommendationJson(request): RecommendationJson,
) -> AppResult<Json<Vec<JobId>>> {
    let request = request.validate().inspect_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Rejected recommendation request");
    })?;

    tracing::info!(
        request_id = %request_id,
        job_count = request.jobs.len(),
        "Processing recommendation request"
    );

    let job_ids = state.recommender.recommend(request)?;

    tracing::info!(
        request_id = %request_id,
        returned = job_ids.len(),
        "Recommendations completed"
    );

    Ok(Json(job_ids))
}
