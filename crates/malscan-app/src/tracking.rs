//! Polling session driving the job tracker.

use std::sync::Arc;
use std::time::Duration;

use malscan_transport::{AnalysisTransport, FailureClass, classify_transport_error};
use malscan_ui::{TrackerState, transition};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{ClientConfig, redact_sensitive};

/// Poll cadence and failure tolerance of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between the end of one fetch and the start of the next.
    pub interval: Duration,
    /// Consecutive transient fetch failures skipped before entering `Error`.
    pub retry_budget: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            retry_budget: 0,
        }
    }
}

impl From<&ClientConfig> for PollSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval,
            retry_budget: config.status_retry_budget,
        }
    }
}

/// One tracking view's polling task.
///
/// Fetches run strictly one after another, so two requests for the same job
/// never overlap. The task ends on a terminal state; dropping the session
/// aborts it earlier.
#[derive(Debug)]
pub struct TrackingSession {
    job_id: String,
    state: watch::Receiver<TrackerState>,
    report_ready: Option<oneshot::Receiver<String>>,
    task: JoinHandle<()>,
}

impl TrackingSession {
    /// Starts polling `job_id` on the current runtime.
    pub fn start(
        transport: Arc<dyn AnalysisTransport>,
        job_id: impl Into<String>,
        settings: PollSettings,
    ) -> Self {
        let job_id = job_id.into();
        let (state_sender, state) = watch::channel(TrackerState::Loading);
        let (ready_sender, report_ready) = oneshot::channel();

        let task = tokio::spawn(poll_until_terminal(
            transport,
            job_id.clone(),
            settings,
            state_sender,
            ready_sender,
        ));

        Self {
            job_id,
            state,
            report_ready: Some(report_ready),
            task,
        }
    }

    /// Tracked job id.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Returns the latest tracker state.
    pub fn state(&self) -> TrackerState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state.clone()
    }

    /// Returns `true` while the polling task is alive.
    pub fn is_polling(&self) -> bool {
        !self.task.is_finished()
    }

    /// Takes the receiver of the report hand-off.
    ///
    /// It resolves with the job id once the job is done, and errors when the
    /// session ends any other way. Subsequent calls return `None`.
    pub fn take_report_ready(&mut self) -> Option<oneshot::Receiver<String>> {
        self.report_ready.take()
    }

    /// Waits until the tracker reaches a terminal state.
    pub async fn wait_terminal(&self) -> TrackerState {
        let mut receiver = self.state.clone();
        if let Ok(state) = receiver.wait_for(TrackerState::is_terminal).await {
            return state.clone();
        }
        receiver.borrow().clone()
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_until_terminal(
    transport: Arc<dyn AnalysisTransport>,
    job_id: String,
    settings: PollSettings,
    state_sender: watch::Sender<TrackerState>,
    ready_sender: oneshot::Sender<String>,
) {
    let mut state = TrackerState::Loading;
    let mut retries_left = settings.retry_budget;
    info!(%job_id, interval_ms = settings.interval.as_millis() as u64, "tracking started");

    loop {
        let outcome = transport.fetch_status(&job_id).await;

        match &outcome {
            Ok(status) => {
                retries_left = settings.retry_budget;
                debug!(
                    %job_id,
                    status = %status.status,
                    percent = status.progress.percent,
                    "status polled"
                );
            }
            Err(error)
                if retries_left > 0
                    && classify_transport_error(error) == FailureClass::Retriable =>
            {
                retries_left -= 1;
                warn!(
                    %job_id,
                    error = %redact_sensitive(&error.message()),
                    retries_left,
                    "transient status failure; retrying"
                );
                tokio::time::sleep(settings.interval).await;
                continue;
            }
            Err(error) => {
                warn!(%job_id, error = %redact_sensitive(&error.message()), "status fetch failed");
            }
        }

        state = transition(&state, outcome);
        state_sender.send_replace(state.clone());

        if state.is_terminal() {
            match state.report_job_id() {
                Some(done_job) => {
                    info!(%job_id, "job done; report ready");
                    let _ = ready_sender.send(done_job.to_string());
                }
                None => info!(%job_id, "tracking ended without report"),
            }
            return;
        }

        tokio::time::sleep(settings.interval).await;
    }
}
