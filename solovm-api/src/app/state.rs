use crate::orchestrator::InstanceOrchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: InstanceOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: InstanceOrchestrator) -> Arc<Self> {
        Arc::new(Self { orchestrator })
    }
}
