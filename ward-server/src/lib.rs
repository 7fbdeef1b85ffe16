mod app;
mod auth;
pub mod config;
mod services;

use anyhow::Result;
use ward_axum::WardApp;
use ward_core::WardConfig;

/// Build from the process environment.
pub async fn build() -> Result<WardApp> {
    build_with(config::from_env()).await
}

/// Build from an explicit configuration; unset keys take their defaults.
pub async fn build_with(mut config: WardConfig) -> Result<WardApp> {
    config::apply_defaults(&mut config);
    let ax = app::ward_app(config.snapshot()).await?;

    let auth = auth::strategies(&ax.state.config)?;
    let state = services::AppState::new(ax.state.clone(), auth);

    let ax = ax
        .use_router("/api/doctor", services::doctors::router(state.clone()))
        .use_router("/api/admin", services::admins::router(state))
        .service("/health", || async { "ok" });

    Ok(ax)
}
