use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use ward_auth::Authenticator;
use ward_core::WardConfig;

fn config() -> WardConfig {
    let mut config = WardConfig::new();
    config.set("hospitals", "H1,H2");
    config.set("hospitals.H1.name", "City Hospital");
    config.set("auth.jwt.secret", "http-test-secret");
    config.set("auth.bcrypt.cost", "4");
    config
}

async fn router() -> Router {
    ward_server::build_with(config()).await.unwrap().into_router()
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    code: Option<&str>,
    token: Option<&str>,
    body: Option<Value>,
) -> (u16, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(code) = code {
        req = req.header("code", code);
    }
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let res = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status().as_u16();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register_doctor(router: &Router, code: &str, email: &str) -> Value {
    let (status, body) = call(
        router,
        "POST",
        "/api/doctor/register",
        Some(code),
        None,
        Some(json!({"name": "Dr. A", "email": email, "password": "p"})),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    body
}

async fn login(router: &Router, role: &str, code: &str, email: &str, password: &str) -> (u16, Value) {
    call(
        router,
        "POST",
        &format!("/api/{role}/login"),
        Some(code),
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

async fn admin_token(router: &Router, code: &str) -> String {
    let (status, _) = call(
        router,
        "POST",
        "/api/admin/register",
        Some(code),
        None,
        Some(json!({"email": "admin@x.com", "password": "adminpw"})),
    )
    .await;
    assert_eq!(status, 200);
    let (_, body) = login(router, "admin", code, "admin@x.com", "adminpw").await;
    body["token"].as_str().unwrap().to_string()
}

async fn queue(router: &Router, code: &str, admin: &str, doctor_id: &str, abha: &str) -> Value {
    let (status, body) = call(
        router,
        "POST",
        "/api/admin/queuepatient",
        Some(code),
        Some(admin),
        Some(json!({
            "doctorId": doctor_id,
            "patient": {"abhaId": abha, "name": "Ravi", "age": 30, "Gender": "Male", "reason": "Cough"}
        })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    body
}

#[tokio::test]
async fn credentials_work_only_in_their_own_hospital() {
    let router = router().await;
    let registered = register_doctor(&router, "H1", "a@x.com").await;
    assert_eq!(registered["success"], true);
    assert!(registered["doctor"].get("password").is_none());

    let (status, body) = login(&router, "doctor", "H1", "a@x.com", "p").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = login(&router, "doctor", "H2", "a@x.com", "p").await;
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let router = router().await;
    register_doctor(&router, "H1", "a@x.com").await;

    let (status, body) = login(&router, "doctor", "H1", "a@x.com", "nope").await;
    assert_eq!(status, 401);
    assert_eq!(body["message"], "Invalid login");
}

#[tokio::test]
async fn missing_or_unknown_hospital_is_tenant_not_found() {
    let router = router().await;

    let (status, body) = call(&router, "GET", "/api/doctor/getPatients", None, None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["name"], "TenantNotFound");

    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/register",
        Some("H9"),
        None,
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["name"], "TenantNotFound");
}

#[tokio::test]
async fn code_in_the_body_selects_the_hospital() {
    let router = router().await;
    let (status, _) = call(
        &router,
        "POST",
        "/api/doctor/register",
        None,
        None,
        Some(json!({"code": "H2", "email": "b@x.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = login(&router, "doctor", "H2", "b@x.com", "p").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() {
    let router = router().await;

    let (status, body) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), None, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["name"], "Unauthorized");

    let (status, _) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), Some("garbage"), None).await;
    assert_eq!(status, 401);

    let mut same_keys = config();
    ward_server::config::apply_defaults(&mut same_keys);
    let auth = Authenticator::from_config(&same_keys.snapshot()).unwrap();
    let registered = register_doctor(&router, "H1", "a@x.com").await;
    let token = registered["token"].as_str().unwrap();
    let mut claims = auth.verify_access_token(token).unwrap();
    claims.iat -= 7200;
    claims.exp = chrono::Utc::now().timestamp() - 3600;
    let expired = auth.sign(&claims).unwrap();

    let (status, body) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), Some(&expired), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn token_from_one_hospital_is_refused_by_another() {
    let router = router().await;
    register_doctor(&router, "H1", "a@x.com").await;
    let (_, body) = login(&router, "doctor", "H1", "a@x.com", "p").await;
    let token = body["token"].as_str().unwrap();

    let (status, _) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), Some(token), None).await;
    assert_eq!(status, 200);

    let (status, body) = call(&router, "GET", "/api/doctor/getPatients", Some("H2"), Some(token), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn roles_are_enforced() {
    let router = router().await;
    let doctor = register_doctor(&router, "H1", "a@x.com").await;
    let doctor_token = doctor["token"].as_str().unwrap();
    let admin = admin_token(&router, "H1").await;

    let (status, body) = call(
        &router,
        "POST",
        "/api/admin/queuepatient",
        Some("H1"),
        Some(doctor_token),
        Some(json!({"doctorId": "x", "patient": {"abhaId": "p", "name": "n", "age": 1, "Gender": "F", "reason": "r"}})),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["name"], "Forbidden");

    let (status, _) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), Some(&admin), None).await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn queued_patients_show_up_on_the_doctor_list() {
    let router = router().await;
    let doctor = register_doctor(&router, "H1", "a@x.com").await;
    let doctor_id = doctor["doctor"]["id"].as_str().unwrap();
    let token = doctor["token"].as_str().unwrap();
    let admin = admin_token(&router, "H1").await;

    let queued = queue(&router, "H1", &admin, doctor_id, "abha-1").await;
    assert_eq!(queued["entry"]["status"], "Pending");
    queue(&router, "H1", &admin, doctor_id, "abha-2").await;

    let (status, first) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), Some(token), None).await;
    assert_eq!(status, 200);
    let patients = first["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0]["patientInstance"]["abhaId"], "abha-1");
    assert_eq!(patients[0]["patientInstance"]["Gender"], "Male");
    assert_eq!(patients[0]["status"], "Pending");

    let (_, second) = call(&router, "GET", "/api/doctor/getPatients", Some("H1"), Some(token), None).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn doctor_updates_status_and_records_care() {
    let router = router().await;
    let doctor = register_doctor(&router, "H1", "a@x.com").await;
    let doctor_id = doctor["doctor"]["id"].as_str().unwrap();
    let token = doctor["token"].as_str().unwrap();
    let admin = admin_token(&router, "H1").await;
    let queued = queue(&router, "H1", &admin, doctor_id, "abha-1").await;
    let entry_id = queued["entry"]["id"].as_str().unwrap();

    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/updatestatus",
        Some("H1"),
        Some(token),
        Some(json!({"entryId": entry_id, "status": "In Progress"})),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["entry"]["status"], "In Progress");

    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/addmedications",
        Some("H1"),
        Some(token),
        Some(json!({
            "abhaId": "abha-1",
            "medications": [{"name": "Paracetamol", "dosage": "500mg", "frequency": "TID"}]
        })),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["medications"][0]["doctorId"], doctor_id);

    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/createadmission",
        Some("H1"),
        Some(token),
        Some(json!({"abhaId": "abha-1", "ward": "B", "reason": "Observation"})),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["admission"]["ward"], "B");

    let (status, _) = call(
        &router,
        "POST",
        "/api/doctor/createadmission",
        Some("H1"),
        Some(token),
        Some(json!({"abhaId": "unknown", "ward": "B", "reason": "Observation"})),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn registration_validates_and_rejects_duplicates() {
    let router = router().await;

    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/register",
        Some("H1"),
        None,
        Some(json!({"email": "not-an-email", "password": "p"})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["name"], "ValidationError");
    assert_eq!(body["errors"]["email"][0], "email must be a valid email");

    register_doctor(&router, "H1", "a@x.com").await;
    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/register",
        Some("H1"),
        None,
        Some(json!({"email": "a@x.com", "password": "q"})),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["name"], "Conflict");
}

#[tokio::test]
async fn directory_lookups() {
    let router = router().await;
    let doctor = register_doctor(&router, "H1", "a@x.com").await;
    let doctor_id = doctor["doctor"]["id"].as_str().unwrap();

    let (status, body) = call(&router, "GET", "/api/doctor/alldoctors", Some("H1"), None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["doctors"].as_array().unwrap().len(), 1);

    let (status, body) = call(&router, "GET", "/api/doctor/alldoctors", Some("H2"), None, None).await;
    assert_eq!(status, 200);
    assert!(body["doctors"].as_array().unwrap().is_empty());

    let (status, body) = call(
        &router,
        "POST",
        "/api/doctor/getdoctor",
        Some("H1"),
        None,
        Some(json!({"id": doctor_id})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["doctor"]["email"], "a@x.com");

    let (status, _) = call(
        &router,
        "POST",
        "/api/doctor/getdoctor",
        Some("H1"),
        None,
        Some(json!({"id": "missing"})),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn health_is_outside_the_tenant_pipeline() {
    let router = router().await;
    let res = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert!(res.headers().get("x-request-id").is_some());
}
