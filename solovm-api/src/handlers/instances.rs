use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::app::AppState;
use crate::orchestrator::OpError;

#[derive(Deserialize)]
pub struct CreateInstanceRequest {
    pub instance_type: Option<String>,
}

#[derive(Deserialize)]
pub struct InstanceIdParams {
    pub instance_id: Option<String>,
}

// Every business outcome ships in the same envelope with transport status
// 200; `result` is the actual success/failure signal.
fn success(data: Value) -> Json<Value> {
    Json(json!({ "result": "success", "data": data }))
}

fn error(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "result": "error", "message": message.into() }))
}

// COMMAND : CREATE INSTANCE
pub async fn create_instance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateInstanceRequest>,
) -> Json<Value> {
    let Some(instance_type) = request.instance_type.filter(|t| !t.is_empty()) else {
        return error("instance_type is not provided in the request.");
    };

    match state.orchestrator.create(&instance_type).await {
        Ok(instance) => success(json!({
            "instanceId": instance.instance_id,
            "publicIp": instance.public_ip,
            "state": instance.state,
        })),
        Err(e) => {
            warn!(instance_type = %instance_type, error = %e, "Create rejected");
            error(format!("{:#}", e))
        }
    }
}

// QUERY : INSTANCE + SERVICE STATUS
pub async fn instance_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InstanceIdParams>,
) -> Json<Value> {
    let Some(instance_id) = params.instance_id.filter(|id| !id.is_empty()) else {
        return error("instance_id is not provided in the request.");
    };

    match state.orchestrator.status(&instance_id).await {
        Ok(snapshot) => success(json!({
            "instance_state": {
                "instanceId": snapshot.instance.instance_id,
                "publicIp": snapshot.instance.public_ip,
                "state": snapshot.instance.state,
                "available": snapshot.instance_available,
            },
            "service_state": { "available": snapshot.service_available },
        })),
        Err(OpError::NotFound) => error("Unable to fetch instance information."),
        Err(e) => {
            warn!(instance_id = %instance_id, error = %e, "Status lookup failed");
            error(format!("{:#}", e))
        }
    }
}

// COMMAND : TERMINATE INSTANCE
pub async fn terminate_instance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InstanceIdParams>,
) -> Json<Value> {
    let Some(instance_id) = params.instance_id.filter(|id| !id.is_empty()) else {
        return error("instance_id is not provided in the request.");
    };

    match state.orchestrator.terminate(&instance_id).await {
        Ok(transition) => success(json!(transition)),
        Err(e) => {
            warn!(instance_id = %instance_id, error = %e, "Terminate failed");
            error(format!("{:#}", e))
        }
    }
}
