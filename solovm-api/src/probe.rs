//! Workload liveness probe.

use reqwest::Client;
use std::time::Duration;

/// Bounded-wait outcome of one probe. Collapsed to a boolean at the API
/// boundary; the distinction is kept here so the downgrade is a choice,
/// not an accident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

/// Outbound HTTP check against the page served from inside the instance.
#[derive(Clone)]
pub struct ServiceProber {
    client: Client,
    port: u16,
}

impl ServiceProber {
    pub fn new(timeout: Duration, port: u16) -> Self {
        // A default reqwest client has no overall timeout; a stalled probe
        // would pin the status request indefinitely.
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .unwrap();

        Self { client, port }
    }

    /// GET the workload's root page. Timeouts and connection failures are
    /// outcomes, not errors.
    pub async fn probe(&self, host: &str) -> ProbeOutcome {
        // Strip CIDR suffix if present (e.g. "1.2.3.4/32" -> "1.2.3.4")
        let host = host.split('/').next().unwrap_or(host);
        let url = if self.port == 80 {
            format!("http://{}/", host)
        } else {
            format!("http://{}:{}/", host, self.port)
        };

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => ProbeOutcome::Reachable,
            Ok(_) => ProbeOutcome::Unreachable,
            Err(e) if e.is_timeout() => ProbeOutcome::TimedOut,
            Err(_) => ProbeOutcome::Unreachable,
        }
    }
}
