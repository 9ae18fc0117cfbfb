// Common test utilities and fixtures
use axum::routing::get;
use axum::Router;
use solovm_api::app::AppState;
use solovm_api::orchestrator::InstanceOrchestrator;
use solovm_api::probe::ServiceProber;
use solovm_api::routes::create_router;
use solovm_providers::inventory::{InstanceState, InstanceSummary};
use solovm_providers::mock::MockProvider;
use std::sync::Arc;
use std::time::Duration;

/// Build the application against the mock provider. `probe_port` is where
/// the liveness probe looks for the workload.
pub fn create_test_app(provider: Arc<MockProvider>, probe_port: u16) -> Router {
    let prober = ServiceProber::new(Duration::from_secs(1), probe_port);
    let orchestrator = InstanceOrchestrator::new(provider, prober);
    let state = AppState::new(orchestrator);
    create_router()
        .with_state(state)
        .layer(solovm_api::app::create_cors())
}

pub fn running_instance(id: &str, ip: &str) -> InstanceSummary {
    InstanceSummary {
        instance_id: id.to_string(),
        public_ip: Some(ip.to_string()),
        state: InstanceState::Running,
        instance_type: Some("t3.micro".to_string()),
    }
}

pub fn pending_instance(id: &str) -> InstanceSummary {
    InstanceSummary {
        instance_id: id.to_string(),
        public_ip: None,
        state: InstanceState::Pending,
        instance_type: Some("t3.micro".to_string()),
    }
}

/// Serve a stand-in workload page on an ephemeral local port.
pub async fn spawn_workload_server() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let app = Router::new().route("/", get(|| async { "<h1>workload</h1>" }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

/// A local port nothing is listening on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
