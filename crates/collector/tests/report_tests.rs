#![cfg(test)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use collector::store::{REPORTS_NAMESPACE, ReportStore};
use testware::{create_failing_store, create_router, create_store};

fn post_report(content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/report");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn submit(app: &Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(post_report(Some("application/json"), body))
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

#[tokio::test]
async fn valid_report_is_stored_and_answered_with_201() {
    let store: ReportStore = create_store();
    let app = create_router(store.clone());

    let envelope = json!({
        "timestamp": "2024-01-01T00:00:00Z",
        "report": {"type": "error", "message": "boom"},
    });
    let (status, body) = submit(&app, &envelope.to_string()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Report received successfully");
    let id = body["id"].as_str().expect("id must be a string");

    // Round trip: the stored record equals the posted body exactly.
    let stored = store.get(REPORTS_NAMESPACE, id).await.unwrap();
    assert_eq!(stored, envelope);
}

#[tokio::test]
async fn extra_envelope_fields_are_stored_verbatim() {
    let store = create_store();
    let app = create_router(store.clone());

    let envelope = json!({
        "timestamp": "2024-01-01T00:00:00Z",
        "report": {"message": "boom"},
        "reporterInfo": {"os": "linux", "arch": "x86_64", "runtime": "reporter/0.1.0"},
    });
    let (status, body) = submit(&app, &envelope.to_string()).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap();
    assert_eq!(store.get(REPORTS_NAMESPACE, id).await.unwrap(), envelope);
}

#[tokio::test]
async fn ids_are_distinct_across_submissions() {
    let app = create_router(create_store());
    let envelope = json!({"timestamp": "2024-01-01T00:00:00Z", "report": {"n": 1}}).to_string();

    let (_, first) = submit(&app, &envelope).await;
    let (_, second) = submit(&app, &envelope).await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = create_router(create_store());

    for method in ["GET", "POST"] {
        let request = Request::builder()
            .method(method)
            .uri("/api/other")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"timestamp":"t","report":{}}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
    }
}

#[tokio::test]
async fn non_post_method_is_405_with_allow_header() {
    let app = create_router(create_store());

    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let request = Request::builder()
            .method(method)
            .uri("/api/report")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        let allow = response
            .headers()
            .get(header::ALLOW)
            .expect("Allow header missing")
            .to_str()
            .unwrap();
        assert_eq!(allow, "POST");
    }
}

#[tokio::test]
async fn missing_or_wrong_content_type_is_415() {
    let app = create_router(create_store());
    let body = r#"{"timestamp":"t","report":{}}"#;

    for content_type in [None, Some("text/plain"), Some("application/octet-stream")] {
        let response = app
            .clone()
            .oneshot(post_report(content_type, body))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "{content_type:?}"
        );
    }
}

#[tokio::test]
async fn content_type_match_is_case_insensitive_and_allows_parameters() {
    let app = create_router(create_store());
    let body = r#"{"timestamp":"t","report":{"message":"boom"}}"#;

    for content_type in ["Application/JSON", "application/json; charset=utf-8"] {
        let response = app
            .clone()
            .oneshot(post_report(Some(content_type), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "{content_type}");
    }
}

#[tokio::test]
async fn syntactically_invalid_json_is_400() {
    let app = create_router(create_store());

    let (status, body) = submit(&app, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], "failed");
    assert!(body["error"].as_str().unwrap().contains("invalid JSON body"));
}

#[tokio::test]
async fn incomplete_envelope_is_400_naming_missing_fields() {
    let app = create_router(create_store());

    let (status, body) = submit(&app, r#"{"timestamp":"t"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("report"));

    let (status, body) = submit(&app, r#"{"report":{}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("timestamp"));

    // Non-object bodies miss everything.
    for body_text in ["null", "[1,2]", "\"boom\""] {
        let (status, body) = submit(&app, body_text).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body_text}");
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("timestamp") && message.contains("report"));
    }
}

#[tokio::test]
async fn storage_failure_is_500_without_internal_detail() {
    let app = create_router(create_failing_store());

    let (status, body) =
        submit(&app, r#"{"timestamp":"t","report":{"message":"boom"}}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["result"], "failed");
    assert_eq!(body["error"], "internal failure");
}
