use axum::routing::post;
use axum::Router;
use ward_axum::PipelineExt;

use crate::services::AppState;

use super::admins_service as svc;

/// Routes under `/api/admin`.
pub fn router(state: AppState) -> Router<()> {
    let open = Router::new()
        .route("/register", post(svc::register))
        .route("/login", post(svc::login))
        .pipeline(state.tenant_only());

    let protected = Router::new()
        .route("/queuepatient", post(svc::queue_patient))
        .pipeline(state.admin_only());

    open.merge(protected).with_state(state)
}
