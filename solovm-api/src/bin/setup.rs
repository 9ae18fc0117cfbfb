//! One-off account setup: creates the fixed key pair and security group the
//! control surface launches instances with. Run once per account, never
//! from the request path. Prints the private key material to stdout.

use anyhow::Result;
use solovm_api::config::Settings;
use solovm_providers::ec2::Ec2Provider;
use solovm_providers::ComputeProvider;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let settings = Settings::from_env();
    let provider = Ec2Provider::new(settings.aws_region).await?;

    let key_material = provider.create_key_pair().await?;
    println!("{}", key_material);

    let group_id = provider.create_security_group().await?;
    info!(sg_id = %group_id, "Account setup complete");

    Ok(())
}
