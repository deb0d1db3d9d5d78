pub mod jobs;
pub mod sync;

use axum::Router;
use axum::routing::{get, patch};

use crate::routes::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Jobs
        .route("/jobs", get(jobs::list))
        .route(
            "/jobs/{id}",
            get(jobs::get).put(jobs::update).delete(jobs::delete),
        )
        .route("/jobs/{id}/status", patch(jobs::update_status))
        .route("/jobs/{id}/description", get(jobs::description))
        // Scraping
        .route("/sync-new-jobs", get(sync::sync_new_jobs).post(sync::sync_new_jobs))
        .with_state(state);

    Router::new().nest("/api", api)
}
