//! Periodic backend health probing.

use std::sync::Arc;
use std::time::Duration;

use malscan_transport::AnalysisTransport;
use malscan_ui::HealthState;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Background health prober.
///
/// Probes once immediately, then on a fixed schedule. Each result overwrites
/// the published state. Dropping the monitor stops the schedule.
#[derive(Debug)]
pub struct HealthMonitor {
    state: watch::Receiver<HealthState>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    /// Spawns the probe task on the current runtime.
    pub fn spawn(transport: Arc<dyn AnalysisTransport>, every: Duration) -> Self {
        let (sender, state) = watch::channel(HealthState::Unknown);

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let next = HealthState::from_probe(transport.check_health().await);
                let previous = sender.send_replace(next);
                match (previous, next) {
                    (previous, next) if previous == next => debug!(state = %next, "health unchanged"),
                    (_, HealthState::Offline) => warn!(state = %next, "backend health changed"),
                    _ => info!(state = %next, "backend health changed"),
                }
            }
        });

        Self { state, task }
    }

    /// Returns the latest published state.
    pub fn state(&self) -> HealthState {
        *self.state.borrow()
    }

    /// Returns a receiver notified on every probe result.
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.state.clone()
    }

    /// Waits until the first probe has completed and returns its result.
    pub async fn first_probe(&self) -> HealthState {
        let mut receiver = self.state.clone();
        receiver
            .wait_for(|state| *state != HealthState::Unknown)
            .await
            .map(|state| *state)
            .unwrap_or(HealthState::Unknown)
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
