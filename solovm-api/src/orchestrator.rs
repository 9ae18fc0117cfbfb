//! Stateless coordinator for the three instance operations. All lifecycle
//! state lives provider-side; every read re-fetches it.

use crate::bootstrap;
use crate::probe::ServiceProber;
use solovm_providers::inventory::{DescribeOutcome, InstanceState, InstanceSummary, StateTransition};
use solovm_providers::ComputeProvider;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum OpError {
    #[error("Instance {instance_id} is already running at {public_ip}")]
    AlreadyExists {
        instance_id: String,
        public_ip: String,
    },
    #[error("Unable to fetch instance information.")]
    NotFound,
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

/// Combined infrastructure/application readiness, computed per request.
#[derive(Clone, Debug)]
pub struct StatusSnapshot {
    pub instance: InstanceSummary,
    pub instance_available: bool,
    pub service_available: bool,
}

#[derive(Clone)]
pub struct InstanceOrchestrator {
    provider: Arc<dyn ComputeProvider>,
    prober: ServiceProber,
}

impl InstanceOrchestrator {
    pub fn new(provider: Arc<dyn ComputeProvider>, prober: ServiceProber) -> Self {
        Self { provider, prober }
    }

    /// Launch the single workload instance.
    ///
    /// The existence guard and the creation call are not atomic with
    /// respect to the provider: two concurrent create requests can both
    /// pass the guard and launch two instances. Strict enforcement would
    /// need a provider-side uniqueness mechanism.
    pub async fn create(&self, instance_type: &str) -> Result<InstanceSummary, OpError> {
        if let Some(existing) = self.provider.find_active_instance().await? {
            return Err(OpError::AlreadyExists {
                instance_id: existing.instance_id,
                public_ip: existing
                    .public_ip
                    .unwrap_or_else(|| "(address pending)".to_string()),
            });
        }

        self.provider.validate_instance_type(instance_type).await?;

        let user_data = bootstrap::docker_nginx_user_data(instance_type);
        let created = self.provider.create_instance(instance_type, &user_data).await?;

        info!(
            instance_id = %created.instance_id,
            instance_type = %instance_type,
            state = %created.state,
            "Instance created"
        );
        Ok(created)
    }

    /// Snapshot one instance's lifecycle state and, when it is running,
    /// probe the workload it serves. Probe failures downgrade to
    /// `service_available = false` instead of failing the request.
    pub async fn status(&self, instance_id: &str) -> Result<StatusSnapshot, OpError> {
        let outcome = self.provider.describe_instance(instance_id).await?;
        debug!(
            instance_id = %instance_id,
            lookup = outcome.status_code(),
            "Instance lookup"
        );

        let instance = match outcome {
            DescribeOutcome::Found(instance) => instance,
            DescribeOutcome::NotFound => return Err(OpError::NotFound),
        };

        let instance_available = instance.state == InstanceState::Running;
        let service_available = if instance_available {
            match instance.public_ip.as_deref() {
                Some(ip) => {
                    let probed = self.prober.probe(ip).await;
                    debug!(instance_id = %instance_id, outcome = ?probed, "Workload probe");
                    probed.is_reachable()
                }
                None => false,
            }
        } else {
            false
        };

        Ok(StatusSnapshot {
            instance,
            instance_available,
            service_available,
        })
    }

    /// Forward a termination request. No existence pre-check: terminating
    /// an unknown identifier surfaces whatever the provider returns.
    pub async fn terminate(&self, instance_id: &str) -> Result<StateTransition, OpError> {
        let transition = self.provider.terminate_instance(instance_id).await?;
        info!(
            instance_id = %transition.instance_id,
            previous = %transition.previous_state,
            current = %transition.current_state,
            "Instance terminating"
        );
        Ok(transition)
    }
}
