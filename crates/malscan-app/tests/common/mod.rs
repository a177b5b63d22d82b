//! Scripted transport and fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use malscan_core::{JobHandle, JobProgress, JobState, JobStatus, SubmittedFile};
use malscan_report_contract::{Report, parse_report};
use malscan_transport::{AnalysisTransport, TransportError};

/// Report fixture with a clean verdict and mocked sandbox.
#[allow(dead_code)]
pub const EMPTY_REPORT: &str = include_str!("../../../../contracts/fixtures/report.empty.valid.json");

/// Transport answering from per-operation scripts and counting every call.
#[derive(Default)]
pub struct ScriptedTransport {
    statuses: Mutex<VecDeque<Result<JobStatus, TransportError>>>,
    health: Mutex<VecDeque<bool>>,
    submit_result: Mutex<Option<Result<JobHandle, TransportError>>>,
    report: Mutex<Option<Result<Report, TransportError>>>,
    /// Number of `fetch_status` calls.
    pub status_calls: AtomicUsize,
    /// Number of `check_health` calls.
    pub health_calls: AtomicUsize,
    /// Number of `submit` calls.
    pub submit_calls: AtomicUsize,
    /// Number of `fetch_report` calls.
    pub report_calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Queues status outcomes; the last one repeats once the queue drains.
    pub fn with_statuses(self, statuses: Vec<Result<JobStatus, TransportError>>) -> Self {
        *self.statuses.lock().expect("status lock") = statuses.into();
        self
    }

    /// Queues health results; the last one repeats once the queue drains.
    pub fn with_health(self, health: Vec<bool>) -> Self {
        *self.health.lock().expect("health lock") = health.into();
        self
    }

    /// Sets the submit outcome.
    pub fn with_submit(self, result: Result<JobHandle, TransportError>) -> Self {
        *self.submit_result.lock().expect("submit lock") = Some(result);
        self
    }

    /// Sets the report outcome.
    pub fn with_report(self, result: Result<Report, TransportError>) -> Self {
        *self.report.lock().expect("report lock") = Some(result);
        self
    }

    /// Returns a call counter value.
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn next_or_last<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().expect("script lock");
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn submit(&self, _file: &SubmittedFile) -> Result<JobHandle, TransportError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit_result
            .lock()
            .expect("submit lock")
            .clone()
            .unwrap_or_else(|| Err(TransportError::Network("no submit scripted".to_string())))
    }

    async fn fetch_status(&self, _job_id: &str) -> Result<JobStatus, TransportError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        next_or_last(&self.statuses)
            .unwrap_or_else(|| Err(TransportError::Network("no status scripted".to_string())))
    }

    async fn fetch_report(&self, _job_id: &str) -> Result<Report, TransportError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.report
            .lock()
            .expect("report lock")
            .clone()
            .unwrap_or_else(|| Err(TransportError::Network("no report scripted".to_string())))
    }

    async fn check_health(&self) -> bool {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        next_or_last(&self.health).unwrap_or(true)
    }
}

/// Builds a status snapshot `tick` seconds after a fixed epoch.
#[allow(dead_code)]
pub fn snapshot(status: JobState, percent: u32, tick: i64) -> JobStatus {
    JobStatus {
        job_id: "job-7".to_string(),
        status,
        progress: JobProgress {
            current_stage: (status == JobState::Scanning).then(|| "yara".to_string()),
            stages_done: percent / 20,
            stages_total: 5,
            percent,
        },
        updated_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::seconds(tick),
        error_message: None,
    }
}

/// Builds a submission handle whose digest matches the content `abc`.
#[allow(dead_code)]
pub fn handle(job_id: &str) -> JobHandle {
    JobHandle {
        job_id: job_id.to_string(),
        file_id: "file-7".to_string(),
        sha256: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".to_string(),
        status: JobState::Queued,
        created_at: Utc
            .with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Parses the clean report fixture.
#[allow(dead_code)]
pub fn empty_report() -> Report {
    parse_report(EMPTY_REPORT.as_bytes()).expect("fixture should parse")
}
