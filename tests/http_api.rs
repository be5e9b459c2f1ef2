use axum::{Router, body::Body, http::Request, http::StatusCode};
use churchdb::web::build_router;
use churchdb::{AppConfig, ChurchApp};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::Mutex;
use tower::ServiceExt;

fn router_for(config: &AppConfig) -> Router {
    let app = ChurchApp::open(config).expect("open app");
    build_router(Arc::new(Mutex::new(app)))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid post request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid get request")
}

#[tokio::test]
async fn http_create_list_and_recover_without_socket() {
    let data = tempdir().expect("temp dir");
    let config = AppConfig::for_testing(data.path());

    let app1 = router_for(&config);
    let (status, created) = request_json(
        &app1,
        post(
            "/api/branches",
            json!({"fields": ["Central", "Ikeja", "12", "Active"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["table"], "branches");
    assert_eq!(created["rows"], 1);

    let (status, table) = request_json(&app1, get("/api/branches")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["title"], "Branches");
    assert_eq!(table["columns"][2], "Total Cell Venues");
    assert_eq!(table["rows"][0], json!(["Central", "Ikeja", 12, "Active"]));
    drop(app1);

    let app2 = router_for(&config);
    let (status, table) = request_json(&app2, get("/api/branches")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["rows"].as_array().map(Vec::len), Some(1));

    let (status, summary) = request_json(&app2, get("/api/branches/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary[0], json!({"label": "Total Branches", "value": 1}));
}

#[tokio::test]
async fn http_rejects_bad_records() {
    let data = tempdir().expect("temp dir");
    let app = router_for(&AppConfig::for_testing(data.path()));

    let (status, body) = request_json(
        &app,
        post("/api/branches", json!({"fields": ["Central", "Ikeja", "12"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "schema_mismatch");

    let (status, _) = request_json(&app, post("/api/pets", json!({"fields": ["Rex"]}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, table) = request_json(&app, get("/api/branches")).await;
    assert_eq!(table["rows"], json!([]));
}

#[tokio::test]
async fn http_duplicate_meeting_day_is_conflict() {
    let app = router_for(&AppConfig::for_testing("unused").in_memory());

    let (status, _) =
        request_json(&app, post("/api/meeting_days", json!({"fields": ["Sunday"]}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        request_json(&app, post("/api/meeting_days", json!({"fields": [" Sunday "]}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (status, options) = request_json(&app, get("/api/service_reports/options")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        options,
        json!([{"column": "Meeting Day", "options": ["Sunday"]}])
    );
}

#[tokio::test]
async fn http_reports_and_dashboard() {
    let app = router_for(&AppConfig::for_testing("unused").in_memory());

    for fields in [
        json!(["Sunday", "120", "50", "70", "3", "5", "2026-05-03"]),
        json!(["Sunday", "80", "30", "50", "1", "2", "2026-06-07"]),
    ] {
        let (status, _) =
            request_json(&app, post("/api/service_reports", json!({"fields": fields}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = request_json(
        &app,
        post(
            "/api/staff",
            json!({"fields": ["Paul", "p@example.org", "0802", "Central", "PCF Pastor"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, chart) = request_json(&app, get("/api/chart/attendance")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart, json!([{"label": "Sunday", "value": 200}]));

    let (_, monthly) = request_json(&app, get("/api/reports?filter=monthly")).await;
    assert_eq!(monthly.as_array().map(Vec::len), Some(2));

    let (status, _) = request_json(&app, get("/api/reports?filter=weekly")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, pastors) = request_json(&app, get("/api/staff/by-role?role=PCF%20Pastor")).await;
    assert_eq!(pastors, json!(["Paul"]));

    let (status, dashboard) = request_json(&app, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["totals"][1], json!({"label": "Total Staff", "value": 1}));
    assert_eq!(dashboard["attendance"][0]["value"], 200);

    let (status, health) = request_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}

async fn request_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request must be served");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();

    if body.is_empty() {
        return (status, Value::Null);
    }

    let json = serde_json::from_slice::<Value>(&body).expect("json body");
    (status, json)
}
