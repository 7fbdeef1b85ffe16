use axum::routing::{get, post};
use axum::Router;
use ward_axum::PipelineExt;

use crate::services::AppState;

use super::doctors_service as svc;

/// Routes under `/api/doctor`.
pub fn router(state: AppState) -> Router<()> {
    let open = Router::new()
        .route("/register", post(svc::register))
        .route("/login", post(svc::login))
        .route("/alldoctors", get(svc::all_doctors))
        .route("/getdoctor", post(svc::get_doctor))
        .pipeline(state.tenant_only());

    let protected = Router::new()
        .route("/getPatients", get(svc::get_patients))
        .route("/addmedications", post(svc::add_medications))
        .route("/createadmission", post(svc::create_admission))
        .route("/updatestatus", post(svc::update_status))
        .pipeline(state.doctor_only());

    open.merge(protected).with_state(state)
}
