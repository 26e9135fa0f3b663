use std::time::Duration;

use tokio::process::Command;

use crate::domain::PingReport;
use crate::provider::{FailureKind, Provider, ProviderFailure, ProviderFuture};
use crate::request::HostName;
use crate::ProviderId;

const PROBES: &str = "4";

/// Runs the system `ping` binary. The child is killed if the call is dropped.
#[derive(Debug, Clone)]
pub struct SystemPingAdapter {
    timeout: Duration,
}

impl SystemPingAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Provider<HostName, PingReport> for SystemPingAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::SystemPing
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a HostName) -> ProviderFuture<'a, PingReport> {
        Box::pin(async move {
            let count_flag = if cfg!(windows) { "-n" } else { "-c" };
            let output = Command::new("ping")
                .args([count_flag, PROBES, input.as_str()])
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|error| ProviderFailure::network(format!("failed to run ping: {error}")))?;

            let stdout = String::from_utf8_lossy(&output.stdout);
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let reason = stderr
                    .lines()
                    .chain(stdout.lines())
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or("no reply");
                return Err(ProviderFailure::new(
                    FailureKind::Network,
                    format!("ping {input} failed ({}): {reason}", output.status),
                ));
            }

            Ok(Some(parse_report(&stdout)))
        })
    }
}

fn parse_report(stdout: &str) -> PingReport {
    PingReport {
        alive: !stdout.to_lowercase().contains("100% packet loss"),
        output: stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect(),
    }
}
