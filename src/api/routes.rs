//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{
    api::types::{GateDto, HealthDto, PredictRequest},
    service::PredictionResponse,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<PredictionResponse> {
    classify(&state, request.text).await.map(Json)
}

pub async fn gate(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<GateDto> {
    let prediction = classify(&state, request.text).await?;
    let accepted = prediction.accepts_funder(state.min_no_funder_confidence);
    Ok(Json(GateDto {
        prediction,
        accepted,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        labels: state.service.labels(),
        vectorizer: state.service.vectorizer().to_string(),
    })
}

// Scoring is CPU-bound; keep it off the async workers.
async fn classify(
    state: &AppState,
    text: String,
) -> Result<PredictionResponse, (StatusCode, String)> {
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || service.predict(&text))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            warn!(error = %e, "prediction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}
