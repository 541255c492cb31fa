use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::{routing::get, Router};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::middlewares::authn;
use super::state::AppState;
use crate::pkg::internal::ingest::validate::{MAX_BATCH_ITEMS, MAX_FILE_BYTES};
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    let app = Router::new()
        .route("/jobs", post(handlers::jobs::create))
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/:id", get(handlers::jobs::get))
        .route("/jobs/:id/applications", post(handlers::applications::bulk_upload))
        .route("/jobs/:id/applications", get(handlers::applications::list_for_job))
        .route("/jobs/:id/applications/pool", post(handlers::applications::reprocess_pool))
        .route("/applications/:id/resume", get(handlers::applications::resume_url))
        .route("/pool", post(handlers::pool::upload))
        .route("/pool", get(handlers::pool::list))
        // a full batch of max-size files must fit through the extractor
        .layer(DefaultBodyLimit::max(MAX_BATCH_ITEMS * MAX_FILE_BYTES + 1024 * 1024))
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
