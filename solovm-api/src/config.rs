use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PROBE_PORT: u16 = 80;

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the control surface listens on.
    pub bind_addr: String,
    /// Overrides the SDK's region resolution when set.
    pub aws_region: Option<String>,
    /// Bound on the workload liveness probe; a stalled probe must not pin
    /// a status request.
    pub probe_timeout: Duration,
    /// Port the workload serves on.
    pub probe_port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let aws_region = std::env::var("AWS_REGION").ok().filter(|r| !r.is_empty());

        let probe_timeout_secs = std::env::var("PROBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS);

        let probe_port = std::env::var("PROBE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PROBE_PORT);

        Self {
            bind_addr,
            aws_region,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
            probe_port,
        }
    }
}
