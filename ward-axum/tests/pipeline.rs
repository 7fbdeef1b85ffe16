use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::routing::{get, post};
use axum::Router;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;
use validator::Validate;
use ward_axum::{ApiReply, PipelineExt, Tenant, ValidJson, WardApp, WardAxumState};
use ward_core::{Hospital, MemoryStoreFactory, TenantRegistry, WardConfig};

#[derive(Debug, Deserialize, Validate)]
struct Echo {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
}

#[derive(Serialize)]
struct Echoed {
    hospital: String,
    name: String,
}

async fn app(hits: Arc<AtomicUsize>) -> Router {
    let registry = Arc::new(TenantRegistry::new(Arc::new(MemoryStoreFactory)));
    registry.provision(Hospital::new("H1", "City", "memory://h1")).await;
    let state = WardAxumState::new(WardConfig::new().snapshot(), registry);

    let get_hits = Arc::clone(&hits);
    let post_hits = Arc::clone(&hits);
    let routes = Router::new()
        .route(
            "/whoami",
            get(move |Tenant(t): Tenant| async move {
                get_hits.fetch_add(1, Ordering::SeqCst);
                ApiReply::ok(json!({"hospital": t.tenant_id, "name": t.hospital_name}))
            }),
        )
        .route(
            "/echo",
            post(move |Tenant(t): Tenant, ValidJson(body): ValidJson<Echo>| async move {
                post_hits.fetch_add(1, Ordering::SeqCst);
                ApiReply::ok(Echoed {
                    hospital: t.tenant_id.to_string(),
                    name: body.name,
                })
            }),
        )
        .pipeline(state.tenant_pipeline());

    WardApp::new(state)
        .use_router("/api", routes)
        .service("/health", || async { "ok" })
        .into_router()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_tenant_short_circuits_before_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let res = app(hits.clone())
        .await
        .oneshot(Request::get("/api/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 404);
    let body = json_body(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["name"], "TenantNotFound");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_tenant_is_not_found() {
    let hits = Arc::new(AtomicUsize::new(0));
    let res = app(hits.clone())
        .await
        .oneshot(Request::get("/api/whoami").header("code", "H9").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn header_tenant_reaches_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let res = app(hits.clone())
        .await
        .oneshot(Request::get("/api/whoami").header("code", "H1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body, json!({"success": true, "hospital": "H1", "name": "City"}));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn body_code_is_used_when_the_header_is_absent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let res = app(hits)
        .await
        .oneshot(
            Request::post("/api/echo")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"code":"H1","name":"ward"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body["hospital"], "H1");
    assert_eq!(body["name"], "ward");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let res = app(hits.clone())
        .await
        .oneshot(
            Request::post("/api/echo")
                .header("content-type", "application/json")
                .header("code", "H1")
                .body(Body::from("{\"name\":\"x\""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["name"], "ValidationError");
    assert!(body["errors"]["_schema"].is_array());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_rules_are_reported_per_field() {
    let hits = Arc::new(AtomicUsize::new(0));
    let res = app(hits)
        .await
        .oneshot(
            Request::post("/api/echo")
                .header("content-type", "application/json")
                .header("code", "H1")
                .body(Body::from(r#"{"name":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["errors"]["name"][0], "name must not be empty");
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = app(hits).await;

    let res = router
        .clone()
        .oneshot(Request::get("/api/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(res.headers().get("x-request-id").is_some());

    let provided = HeaderValue::from_static("req-test-123");
    let res = router
        .oneshot(
            Request::get("/health")
                .header("x-request-id", provided.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}
