//! In-process tests for the HTTP API against the shipped models

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use lungscreen_classifiers::{ModelRegistry, RegistryConfig};
use lungscreen_notify::{NotifyConfig, VerdictNotifier};
use lungscreen_server::{create_router, AppState, ServerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

fn app_with(config: ServerConfig) -> Router {
    let registry = ModelRegistry::load(&RegistryConfig {
        models_dir: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models")),
        ..RegistryConfig::default()
    })
    .unwrap();

    // No auto-location, so nothing here touches the network
    let notifier = VerdictNotifier::from_config(&NotifyConfig::default()).unwrap();
    let handle = PrometheusBuilder::new().build_recorder().handle();

    create_router(AppState::from_parts(config, registry, notifier, handle))
}

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn all_no() -> Value {
    json!({
        "yellow_fingers": "No",
        "anxiety": "No",
        "peer_pressure": "No",
        "chronic_disease": "No",
        "fatigue": "No",
        "allergy": "No",
        "wheezing": "No",
        "alcohol": "No",
        "coughing": "No",
        "swallowing_difficulty": "No",
        "chest_pain": "No"
    })
}

fn predict_request(body: &Value) -> Request<Body> {
    Request::post("/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = app()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_models() {
    let (status, body) = send(
        app(),
        Request::get("/v1/models").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models"], json!(["Random Forest", "XGBoost"]));
    assert_eq!(body["default"], "Random Forest");
}

#[tokio::test]
async fn test_predict_low_risk_with_default_model() {
    let (status, body) = send(
        app(),
        predict_request(&json!({ "patient_name": "Asha", "symptoms": all_no() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient_name"], "Asha");
    assert_eq!(body["verdict"]["label"], "low_risk");
    assert_eq!(body["verdict"]["model"], "Random Forest");
    assert!((body["confidence_percent"].as_f64().unwrap() - 58.3333).abs() < 0.01);
    assert!(body.get("hospital_search_url").is_none());
    assert!(!body["request_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_predict_high_risk_includes_hospital_link() {
    let mut symptoms = all_no();
    symptoms["yellow_fingers"] = json!("Yes");
    symptoms["anxiety"] = json!(true);

    let (status, body) = send(
        app(),
        predict_request(&json!({
            "model": "Random Forest",
            "patient_name": "Ravi",
            "symptoms": symptoms,
            "location": "New Delhi"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verdict"]["label"], "high_risk");
    assert_eq!(
        body["hospital_search_url"],
        "https://www.google.com/maps/search/cancer+hospitals+near+New+Delhi"
    );
}

#[tokio::test]
async fn test_same_record_different_models() {
    let mut symptoms = all_no();
    symptoms["yellow_fingers"] = json!("Yes");
    symptoms["anxiety"] = json!("Yes");

    let (_, rf) = send(
        app(),
        predict_request(&json!({
            "model": "Random Forest",
            "patient_name": "Ravi",
            "symptoms": symptoms.clone()
        })),
    )
    .await;
    let (_, xgb) = send(
        app(),
        predict_request(&json!({
            "model": "XGBoost",
            "patient_name": "Ravi",
            "symptoms": symptoms
        })),
    )
    .await;

    assert_eq!(rf["verdict"]["model"], "Random Forest");
    assert_eq!(rf["verdict"]["label"], "high_risk");
    assert_eq!(xgb["verdict"]["model"], "XGBoost");
    assert_eq!(xgb["verdict"]["label"], "low_risk");
}

#[tokio::test]
async fn test_empty_patient_name_is_rejected() {
    let (status, body) = send(
        app(),
        predict_request(&json!({ "patient_name": "  ", "symptoms": all_no() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_missing_symptom_is_unprocessable() {
    let mut symptoms = all_no();
    symptoms.as_object_mut().unwrap().remove("chest_pain");

    let (status, body) = send(
        app(),
        predict_request(&json!({ "patient_name": "Asha", "symptoms": symptoms })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "encoding");
    assert!(body["error"]["message"].as_str().unwrap().contains("chest_pain"));
}

#[tokio::test]
async fn test_numeric_answer_is_unprocessable() {
    let mut symptoms = all_no();
    symptoms["anxiety"] = json!(1);

    let (status, body) = send(
        app(),
        predict_request(&json!({ "patient_name": "Asha", "symptoms": symptoms })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "encoding");
    assert!(body["error"]["message"].as_str().unwrap().contains("anxiety"));
}

#[tokio::test]
async fn test_unknown_model_is_not_found() {
    let (status, body) = send(
        app(),
        predict_request(&json!({
            "model": "SVM",
            "patient_name": "Asha",
            "symptoms": all_no()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "unknown_model");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::post("/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"patient_name\": "))
        .unwrap();

    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    };

    let response = app_with(config)
        .oneshot(predict_request(
            &json!({ "patient_name": "Asha", "symptoms": all_no() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app()
        .oneshot(Request::get("/v2/nothing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
