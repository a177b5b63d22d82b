//! Shared snapshot builders for UI state machine tests.

use chrono::{Duration, TimeZone, Utc};
use malscan_core::{JobHandle, JobProgress, JobState, JobStatus, SubmittedFile};

/// Builds a status snapshot `tick` seconds after a fixed epoch.
#[allow(dead_code)]
pub fn snapshot(status: JobState, percent: u32, stage: Option<&str>, tick: i64) -> JobStatus {
    JobStatus {
        job_id: "job-42".to_string(),
        status,
        progress: JobProgress {
            current_stage: stage.map(str::to_string),
            stages_done: percent / 20,
            stages_total: 5,
            percent,
        },
        updated_at: epoch() + Duration::seconds(tick),
        error_message: None,
    }
}

/// Builds the handle returned for a successful upload.
#[allow(dead_code)]
pub fn handle(job_id: &str) -> JobHandle {
    JobHandle {
        job_id: job_id.to_string(),
        file_id: "file-1".to_string(),
        sha256: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".to_string(),
        status: JobState::Queued,
        created_at: epoch(),
    }
}

/// Builds a size-only file reference without allocating its content.
#[allow(dead_code)]
pub fn sized_file(name: &str, byte_size: u64) -> SubmittedFile {
    SubmittedFile {
        name: name.to_string(),
        byte_size,
        content: malscan_core::FileContent::Memory(Vec::new()),
    }
}

fn epoch() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}
