pub mod health;
pub mod ui;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::criteria::handlers as criteria_handlers;
use crate::scoring::handlers as scoring_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/extract-criteria",
            post(criteria_handlers::handle_extract_criteria),
        )
        .route("/get-criteria", get(criteria_handlers::handle_get_criteria))
        .route(
            "/score-resumes",
            post(scoring_handlers::handle_score_resumes),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
