use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/counter/increment", post(handlers::increment_form))
        .route("/counter/decrement", post(handlers::decrement_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/counter", post(handlers::update_counter))
        .route("/api/history", get(handlers::get_history))
        .route("/api/export", get(handlers::export_backup))
        .route("/api/import", post(handlers::import_backup))
        .with_state(state)
}
