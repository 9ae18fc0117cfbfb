//! EC2 implementation of the compute provider seam.

use crate::inventory::{DescribeOutcome, InstanceState, InstanceSummary, StateTransition};
use crate::ComputeProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_ec2::types::{Filter, InstanceType, IpPermission, IpRange};
use aws_sdk_ec2::Client;
use tracing::{debug, info};

/// Pinned machine image (Amazon Linux 2, x86_64, gp2). Pinning replaces
/// sorting the provider's image catalog by creation date on every launch.
pub const MACHINE_IMAGE_ID: &str = "ami-068d43a544160b7ef";

/// Key pair attached to every launched instance. Created once per account
/// by the setup binary.
pub const KEY_PAIR_NAME: &str = "solovm";

/// Security group attached to every launched instance. Created once per
/// account by the setup binary, with inbound TCP 22 and 80 open.
pub const SECURITY_GROUP_NAME: &str = "solovm-sg";

/// Long-lived EC2 client handle, constructed once at startup and injected
/// into the orchestration layer.
pub struct Ec2Provider {
    client: Client,
}

impl Ec2Provider {
    /// Build the client from the SDK's default credential chain. A region
    /// passed here overrides the environment/profile region.
    pub async fn new(region: Option<String>) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;

        Ok(Self {
            client: Client::new(&config),
        })
    }

    /// The machine image every instance boots from.
    pub fn eligible_machine_image(&self) -> &'static str {
        MACHINE_IMAGE_ID
    }
}

fn map_state(name: &aws_sdk_ec2::types::InstanceStateName) -> Result<InstanceState> {
    use aws_sdk_ec2::types::InstanceStateName;

    Ok(match name {
        InstanceStateName::Pending => InstanceState::Pending,
        InstanceStateName::Running => InstanceState::Running,
        InstanceStateName::ShuttingDown => InstanceState::ShuttingDown,
        InstanceStateName::Terminated => InstanceState::Terminated,
        InstanceStateName::Stopping => InstanceState::Stopping,
        InstanceStateName::Stopped => InstanceState::Stopped,
        other => anyhow::bail!("Unknown instance state: {}", other.as_str()),
    })
}

fn summarize(instance: &aws_sdk_ec2::types::Instance) -> Result<InstanceSummary> {
    let instance_id = instance
        .instance_id()
        .context("No instance ID in response")?
        .to_string();

    let state_name = instance
        .state()
        .and_then(|s| s.name())
        .context("No instance state in response")?;

    Ok(InstanceSummary {
        instance_id,
        public_ip: instance.public_ip_address().map(str::to_string),
        state: map_state(state_name)?,
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
    })
}

#[async_trait]
impl ComputeProvider for Ec2Provider {
    async fn find_active_instance(&self) -> Result<Option<InstanceSummary>> {
        let response = self
            .client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name("instance-state-name")
                    .values("pending")
                    .values("running")
                    .build(),
            )
            .send()
            .await
            .context("Failed to list active instances")?;

        // Only the first reservation on the first page is consulted: with
        // the single-instance guard holding, at most one match exists.
        let instance = response
            .reservations()
            .first()
            .and_then(|r| r.instances().first());

        match instance {
            Some(instance) => Ok(Some(summarize(instance)?)),
            None => Ok(None),
        }
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<DescribeOutcome> {
        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .context("Failed to describe instance")?;

        let instance = response
            .reservations()
            .first()
            .and_then(|r| r.instances().first());

        match instance {
            Some(instance) => Ok(DescribeOutcome::Found(summarize(instance)?)),
            None => {
                debug!(instance_id = %instance_id, "Describe resolved to zero instances");
                Ok(DescribeOutcome::NotFound)
            }
        }
    }

    async fn validate_instance_type(&self, instance_type: &str) -> Result<()> {
        // The provider rejects unrecognized labels itself; this call either
        // succeeds or surfaces that rejection.
        self.client
            .describe_instance_types()
            .instance_types(InstanceType::from(instance_type))
            .send()
            .await
            .with_context(|| format!("Instance type {} is not available", instance_type))?;

        Ok(())
    }

    async fn create_instance(
        &self,
        instance_type: &str,
        user_data: &str,
    ) -> Result<InstanceSummary> {
        info!(
            instance_type = %instance_type,
            image = %MACHINE_IMAGE_ID,
            "Launching instance"
        );

        let user_data_b64 = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            user_data.as_bytes(),
        );

        let response = self
            .client
            .run_instances()
            .image_id(self.eligible_machine_image())
            .instance_type(InstanceType::from(instance_type))
            .min_count(1)
            .max_count(1)
            .user_data(user_data_b64)
            .key_name(KEY_PAIR_NAME)
            .security_groups(SECURITY_GROUP_NAME)
            .send()
            .await
            .context("Failed to launch instance")?;

        let instance = response
            .instances()
            .first()
            .context("No instance in creation response")?;

        let summary = summarize(instance)?;
        info!(instance_id = %summary.instance_id, "Instance launched");

        Ok(summary)
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<StateTransition> {
        info!(instance_id = %instance_id, "Terminating instance");

        let response = self
            .client
            .terminate_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .context("Failed to terminate instance")?;

        let change = response
            .terminating_instances()
            .first()
            .context("No state change in termination response")?;

        let previous = change
            .previous_state()
            .and_then(|s| s.name())
            .context("No previous state in termination response")?;
        let current = change
            .current_state()
            .and_then(|s| s.name())
            .context("No current state in termination response")?;

        Ok(StateTransition {
            instance_id: change
                .instance_id()
                .unwrap_or(instance_id)
                .to_string(),
            previous_state: map_state(previous)?,
            current_state: map_state(current)?,
        })
    }

    async fn create_key_pair(&self) -> Result<String> {
        let response = self
            .client
            .create_key_pair()
            .key_name(KEY_PAIR_NAME)
            .send()
            .await
            .context("Failed to create key pair")?;

        let material = response
            .key_material()
            .context("No key material in response")?
            .to_string();

        info!(key_name = %KEY_PAIR_NAME, "Key pair created");
        Ok(material)
    }

    async fn create_security_group(&self) -> Result<String> {
        let vpcs = self
            .client
            .describe_vpcs()
            .filters(Filter::builder().name("isDefault").values("true").build())
            .send()
            .await
            .context("Failed to describe VPCs")?;

        let vpc_id = vpcs
            .vpcs()
            .first()
            .and_then(|v| v.vpc_id())
            .context("No default VPC found")?
            .to_string();

        let created = self
            .client
            .create_security_group()
            .group_name(SECURITY_GROUP_NAME)
            .description("solovm single-instance workload")
            .vpc_id(&vpc_id)
            .send()
            .await
            .context("Failed to create security group")?;

        let group_id = created
            .group_id()
            .context("No security group ID in response")?
            .to_string();

        info!(sg_id = %group_id, vpc_id = %vpc_id, "Security group created, adding rules");

        let ssh_permission = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(22)
            .to_port(22)
            .ip_ranges(
                IpRange::builder()
                    .cidr_ip("0.0.0.0/0")
                    .description("SSH access")
                    .build(),
            )
            .build();

        let http_permission = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(80)
            .to_port(80)
            .ip_ranges(
                IpRange::builder()
                    .cidr_ip("0.0.0.0/0")
                    .description("Workload HTTP access")
                    .build(),
            )
            .build();

        self.client
            .authorize_security_group_ingress()
            .group_id(&group_id)
            .ip_permissions(ssh_permission)
            .ip_permissions(http_permission)
            .send()
            .await
            .context("Failed to add ingress rules to security group")?;

        info!(sg_id = %group_id, "Security group ready with SSH and HTTP rules");
        Ok(group_id)
    }
}
