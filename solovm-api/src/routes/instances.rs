// Instance lifecycle routes
use crate::app::AppState;
use crate::handlers::instances;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

pub fn create_instance_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(instances::create_instance))
        .route("/status", get(instances::instance_status))
        .route("/terminate", delete(instances::terminate_instance))
}
