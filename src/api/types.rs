//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::service::PredictionResponse;

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Prediction plus the pipeline's accept/reject decision.
#[derive(Debug, Clone, Serialize)]
pub struct GateDto {
    #[serde(flatten)]
    pub prediction: PredictionResponse,
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub labels: Vec<String>,
    pub vectorizer: String,
}
