//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lungscreen_core::{ErrorKind, RiskVerdict, SymptomForm};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/v1/models", get(list_models))
        .route("/v1/predict", post(predict))
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default: String,
}

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let registry = state.classifier.registry();
    Json(ModelsResponse {
        models: registry.model_names(),
        default: registry.default_model().to_string(),
    })
}

/// Prediction request
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Registered model name; the registry default when absent
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub patient_name: String,

    pub symptoms: SymptomForm,

    /// Where to search for hospitals on a high-risk verdict
    #[serde(default)]
    pub location: Option<String>,
}

/// Prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: String,
    pub patient_name: String,
    pub verdict: RiskVerdict,
    pub confidence_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_search_url: Option<String>,
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(req) = payload?;
    let request_id = Uuid::new_v4().to_string();

    let patient_name = req.patient_name.trim();
    if patient_name.is_empty() {
        return Err(AppError::InvalidRequest(
            "patient_name must not be empty".to_string(),
        ));
    }

    let registry = state.classifier.registry();
    let model = req
        .model
        .as_deref()
        .unwrap_or_else(|| registry.default_model());

    debug!(request_id = %request_id, model = model, "Received prediction request");

    let start = Instant::now();
    let verdict = state
        .classifier
        .classify(&req.symptoms, model)
        .map_err(|e| {
            metrics::counter!("lungscreen_prediction_errors_total", "kind" => e.kind().as_str())
                .increment(1);
            warn!(request_id = %request_id, model = model, error = %e, "Prediction failed");
            e
        })?;
    let latency_us = start.elapsed().as_micros() as f64;

    metrics::counter!(
        "lungscreen_predictions_total",
        "model" => verdict.model.clone(),
        "label" => verdict.label.as_str()
    )
    .increment(1);
    metrics::histogram!("lungscreen_inference_latency_us", "model" => verdict.model.clone())
        .record(latency_us);

    info!(
        request_id = %request_id,
        model = %verdict.model,
        label = verdict.label.as_str(),
        confidence = verdict.confidence,
        "Prediction complete"
    );

    let notification = state.notifier.notify(&verdict, req.location.as_deref()).await;

    Ok(Json(PredictResponse {
        request_id,
        patient_name: patient_name.to_string(),
        confidence_percent: verdict.confidence_percent(),
        hospital_search_url: notification.hospital_search_url.map(String::from),
        verdict,
    }))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    PayloadTooLarge(String),
    Classification(lungscreen_core::Error),
}

impl From<lungscreen_core::Error> for AppError {
    fn from(err: lungscreen_core::Error) -> Self {
        AppError::Classification(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::InvalidRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "invalid_request", msg)
            }
            AppError::Classification(err) => {
                let kind = err.kind();
                let status = match kind {
                    ErrorKind::Encoding => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::UnknownModel => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, kind.as_str(), err.to_string())
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "type": error_type,
            }
        });

        (status, Json(body)).into_response()
    }
}
