use solovm_api::app::{create_cors, AppState};
use solovm_api::config::Settings;
use solovm_api::orchestrator::InstanceOrchestrator;
use solovm_api::probe::ServiceProber;
use solovm_api::routes::create_router;
use solovm_providers::ec2::Ec2Provider;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let settings = Settings::from_env();

    // One long-lived client handle for the whole process.
    let provider = Ec2Provider::new(settings.aws_region.clone())
        .await
        .expect("Failed to build EC2 client");

    let prober = ServiceProber::new(settings.probe_timeout, settings.probe_port);
    let orchestrator = InstanceOrchestrator::new(Arc::new(provider), prober);
    let state = AppState::new(orchestrator);

    let app = create_router().with_state(state).layer(create_cors());

    info!(addr = %settings.bind_addr, "solovm control surface listening");
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.unwrap();
}
