// Public informational routes
use crate::app::AppState;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn create_public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> &'static str {
    "solovm control surface"
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
