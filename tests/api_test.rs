// Integration tests for the conversion JSON API.
//
// Exercises the router via tower::ServiceExt (no TCP listener needed).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use braillescore::web::{self, pages, AppState};

/// Build the app the way `main` does, minus the listener.
fn build_app() -> Router {
    let landing_page = pages::render_index().expect("landing page should render");
    web::router(Arc::new(AppState { landing_page }))
}

fn convert_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/data")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_to_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const SKETCH: &str = "X: 1\nT: Sketch\nK: C\nL: 1/4\nM: 4/4\n| A B c d |]";

#[tokio::test]
async fn test_landing_page() {
    let app = build_app();
    let req = Request::get("/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("T: Sketch"));
}

#[tokio::test]
async fn test_convert_success() {
    let app = build_app();
    let req = convert_request(json!({ "userdata": SKETCH }));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["error"], "");
    assert!(!body["braille"].as_str().unwrap().is_empty());
    assert!(!body["asciiBraille"].as_str().unwrap().is_empty());
    assert!(body["musicxml"]
        .as_str()
        .unwrap()
        .contains("<score-partwise"));
}

#[tokio::test]
async fn test_empty_input_reports_converter_error() {
    let app = build_app();
    let req = convert_request(json!({ "userdata": "" }));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["error"], "Converter cannot parse empty string");
    assert_eq!(body["braille"], "");
    assert_eq!(body["asciiBraille"], "");
    assert_eq!(body["musicxml"], "");
}

#[tokio::test]
async fn test_whitespace_input_counts_as_empty() {
    let app = build_app();
    let req = convert_request(json!({ "userdata": "  \n\t " }));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["error"], "Converter cannot parse empty string");
}

#[tokio::test]
async fn test_invalid_syntax_reports_conversion_failure() {
    let app = build_app();
    let req = convert_request(json!({ "userdata": "this is not a tune" }));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_json(resp.into_body()).await;
    assert_eq!(body["error"], "Invalid syntax. Unable to convert.");
    assert_eq!(body["braille"], "");
    assert_eq!(body["musicxml"], "");
}

#[tokio::test]
async fn test_has_pickup_controls_measure_numbering() {
    let app = build_app();
    let req = convert_request(json!({
        "userdata": SKETCH,
        "args": { "hasPickup": true }
    }));
    let resp = app.oneshot(req).await.unwrap();
    let body = body_to_json(resp.into_body()).await;
    assert!(body["musicxml"]
        .as_str()
        .unwrap()
        .contains("<measure number=\"0\" implicit=\"yes\">"));

    let app = build_app();
    let req = convert_request(json!({ "userdata": SKETCH }));
    let resp = app.oneshot(req).await.unwrap();
    let body = body_to_json(resp.into_body()).await;
    assert!(body["musicxml"]
        .as_str()
        .unwrap()
        .contains("<measure number=\"1\">"));
}

#[tokio::test]
async fn test_exactly_one_response_path_is_populated() {
    for (userdata, expect_outputs) in [(SKETCH, true), ("{{{", false), ("", false)] {
        let app = build_app();
        let req = convert_request(json!({ "userdata": userdata }));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_to_json(resp.into_body()).await;
        let has_outputs = !body["braille"].as_str().unwrap().is_empty();
        let has_error = !body["error"].as_str().unwrap().is_empty();
        assert_eq!(has_outputs, expect_outputs);
        assert_ne!(has_outputs, has_error);
    }
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = build_app();
    let req = Request::post("/data")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"userdata\""))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_missing_args_defaults_to_renumbering() {
    let app = build_app();
    let req = convert_request(json!({ "userdata": SKETCH }));
    let resp = app.oneshot(req).await.unwrap();
    let body = body_to_json(resp.into_body()).await;
    assert!(!body["musicxml"].as_str().unwrap().contains("implicit"));
}
