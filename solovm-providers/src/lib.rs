use anyhow::Result;
use async_trait::async_trait;

use crate::inventory::{DescribeOutcome, InstanceSummary, StateTransition};

/// Seam between the orchestration layer and the compute provider.
///
/// Each method maps to exactly one provider API call and returns the
/// provider's answer with only shape normalization applied. No retries, no
/// backoff, no circuit breaking: provider failures propagate unmodified.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// First instance in state pending or running, if any. Ordering beyond
    /// the provider default is not guaranteed, and only the first page of
    /// results is consulted.
    async fn find_active_instance(&self) -> Result<Option<InstanceSummary>>;

    /// Look up one instance by identifier. An identifier that resolves to
    /// zero reservations (or zero instances within one) is a miss, not an
    /// error; a malformed or rejected identifier surfaces the provider's
    /// own error.
    async fn describe_instance(&self, instance_id: &str) -> Result<DescribeOutcome>;

    /// Ask the provider's type-description endpoint about a type label.
    /// The provider fails the call itself for an unrecognized label; no
    /// local validation happens here.
    async fn validate_instance_type(&self, instance_type: &str) -> Result<()>;

    /// Launch exactly one instance of the given type with the given
    /// boot-time user data, using the provider implementation's fixed
    /// machine image, key pair, and security group.
    async fn create_instance(&self, instance_type: &str, user_data: &str)
        -> Result<InstanceSummary>;

    /// Request termination of exactly one instance; returns the provider's
    /// previous/current state pair. No existence pre-check.
    async fn terminate_instance(&self, instance_id: &str) -> Result<StateTransition>;

    // One-off account setup helpers. Invoked out-of-band (see the setup
    // binary), never from the request path.

    /// Create the fixed key pair; returns the private key material.
    async fn create_key_pair(&self) -> Result<String>;

    /// Create the fixed security group in the default VPC with inbound TCP
    /// 22 and 80 open to all sources; returns the group identifier.
    async fn create_security_group(&self) -> Result<String>;
}

pub mod inventory {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Provider-owned lifecycle state. Never cached locally; every read
    /// re-fetches from the provider.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum InstanceState {
        Pending,
        Running,
        ShuttingDown,
        Terminated,
        Stopping,
        Stopped,
    }

    impl InstanceState {
        /// Active means the single-instance guard counts it.
        pub fn is_active(self) -> bool {
            matches!(self, InstanceState::Pending | InstanceState::Running)
        }

        pub fn as_str(self) -> &'static str {
            match self {
                InstanceState::Pending => "pending",
                InstanceState::Running => "running",
                InstanceState::ShuttingDown => "shutting-down",
                InstanceState::Terminated => "terminated",
                InstanceState::Stopping => "stopping",
                InstanceState::Stopped => "stopped",
            }
        }
    }

    impl fmt::Display for InstanceState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Snapshot of one provider-managed virtual machine. The public address
    /// is assigned asynchronously after creation and may be absent while
    /// the instance is provisioning.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct InstanceSummary {
        pub instance_id: String,
        pub public_ip: Option<String>,
        pub state: InstanceState,
        pub instance_type: Option<String>,
    }

    /// Outcome of a single-instance lookup that can legitimately miss.
    #[derive(Clone, Debug)]
    pub enum DescribeOutcome {
        Found(InstanceSummary),
        NotFound,
    }

    impl DescribeOutcome {
        /// HTTP-like status code used internally for the lookup.
        pub fn status_code(&self) -> u16 {
            match self {
                DescribeOutcome::Found(_) => 200,
                DescribeOutcome::NotFound => 404,
            }
        }
    }

    /// Provider's answer to a termination request.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StateTransition {
        pub instance_id: String,
        pub previous_state: InstanceState,
        pub current_state: InstanceState,
    }
}

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "ec2")]
pub mod ec2;

#[cfg(test)]
mod tests {
    use super::inventory::*;

    #[test]
    fn active_states_are_pending_and_running() {
        assert!(InstanceState::Pending.is_active());
        assert!(InstanceState::Running.is_active());
        assert!(!InstanceState::ShuttingDown.is_active());
        assert!(!InstanceState::Terminated.is_active());
        assert!(!InstanceState::Stopping.is_active());
        assert!(!InstanceState::Stopped.is_active());
    }

    #[test]
    fn state_serializes_to_provider_names() {
        let json = serde_json::to_string(&InstanceState::ShuttingDown).unwrap();
        assert_eq!(json, "\"shutting-down\"");
        let json = serde_json::to_string(&InstanceState::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }

    #[test]
    fn describe_outcome_status_codes() {
        let found = DescribeOutcome::Found(InstanceSummary {
            instance_id: "i-0123".to_string(),
            public_ip: None,
            state: InstanceState::Pending,
            instance_type: Some("t3.micro".to_string()),
        });
        assert_eq!(found.status_code(), 200);
        assert_eq!(DescribeOutcome::NotFound.status_code(), 404);
    }

    #[test]
    fn state_transition_serializes_camel_case() {
        let transition = StateTransition {
            instance_id: "i-0123".to_string(),
            previous_state: InstanceState::Running,
            current_state: InstanceState::ShuttingDown,
        };
        let value = serde_json::to_value(&transition).unwrap();
        assert_eq!(value["instanceId"], "i-0123");
        assert_eq!(value["previousState"], "running");
        assert_eq!(value["currentState"], "shutting-down");
    }
}
