//! Integration tests for upload selection and submission gating.

mod common;

use malscan_core::MAX_UPLOAD_BYTES;
use malscan_transport::TransportError;
use malscan_ui::{HealthState, SelectionSource, SkipReason, UploadCoordinator, UploadPhase};

#[test]
fn upload_coordinator_tests_size_ceiling_applies_to_both_sources() {
    for source in [SelectionSource::Drop, SelectionSource::Picker] {
        let mut coordinator = UploadCoordinator::new();

        let error = coordinator
            .select_file(common::sized_file("big.bin", 25 * 1024 * 1024), source)
            .expect_err("oversized file should be rejected");
        assert_eq!(
            error.to_string(),
            "file size exceeds the 20 MB limit (actual: 25.00 MB)"
        );
        assert_eq!(coordinator.error(), Some(error.to_string().as_str()));
        assert_eq!(coordinator.phase(), UploadPhase::Empty);

        coordinator
            .select_file(common::sized_file("edge.bin", MAX_UPLOAD_BYTES), source)
            .expect("file at the ceiling should be accepted");
        assert_eq!(coordinator.error(), None);
        assert_eq!(coordinator.phase(), UploadPhase::Selected);
    }
}

#[test]
fn upload_coordinator_tests_submit_is_noop_without_file_or_when_offline() {
    let mut coordinator = UploadCoordinator::new();
    assert_eq!(
        coordinator.begin_submit(HealthState::Online),
        Err(SkipReason::NoFile)
    );

    coordinator
        .select_file(common::sized_file("a.bin", 10), SelectionSource::Picker)
        .expect("small file should be accepted");
    assert_eq!(
        coordinator.begin_submit(HealthState::Offline),
        Err(SkipReason::BackendOffline)
    );
    assert_eq!(coordinator.phase(), UploadPhase::Selected);
}

#[test]
fn upload_coordinator_tests_second_submit_while_in_flight_is_skipped() {
    let mut coordinator = UploadCoordinator::new();
    coordinator
        .select_file(common::sized_file("a.bin", 10), SelectionSource::Drop)
        .expect("small file should be accepted");

    let file = coordinator
        .begin_submit(HealthState::Online)
        .expect("first submit should start");
    assert_eq!(file.name, "a.bin");
    assert_eq!(coordinator.phase(), UploadPhase::Submitting);
    assert_eq!(
        coordinator.begin_submit(HealthState::Online),
        Err(SkipReason::AlreadySubmitting)
    );
}

#[test]
fn upload_coordinator_tests_success_hands_off_and_clears_selection() {
    let mut coordinator = UploadCoordinator::new();
    coordinator
        .select_file(common::sized_file("sample.exe", 4096), SelectionSource::Picker)
        .expect("small file should be accepted");
    coordinator
        .begin_submit(HealthState::Unknown)
        .expect("submit should start");

    let handoff = coordinator
        .complete_submit(Ok(common::handle("job-42")))
        .expect("success should hand off");
    assert_eq!(handoff.job.job_id, "job-42");
    assert_eq!(handoff.file_name, "sample.exe");
    assert_eq!(handoff.file_size, 4096);
    assert_eq!(coordinator.phase(), UploadPhase::Empty);
}

#[test]
fn upload_coordinator_tests_failure_returns_to_selected_with_message() {
    let mut coordinator = UploadCoordinator::new();
    coordinator
        .select_file(common::sized_file("sample.exe", 4096), SelectionSource::Picker)
        .expect("small file should be accepted");
    coordinator
        .begin_submit(HealthState::Online)
        .expect("submit should start");

    let handoff = coordinator.complete_submit(Err(TransportError::Api {
        status: 413,
        message: "File size exceeds limit".to_string(),
    }));
    assert!(handoff.is_none());
    assert_eq!(coordinator.error(), Some("File size exceeds limit"));
    assert_eq!(coordinator.phase(), UploadPhase::Selected);
}

#[test]
fn upload_coordinator_tests_handoff_describes_file_actually_submitted() {
    let mut coordinator = UploadCoordinator::new();
    coordinator
        .select_file(common::sized_file("first.exe", 4096), SelectionSource::Picker)
        .expect("small file should be accepted");
    coordinator
        .begin_submit(HealthState::Online)
        .expect("submit should start");

    coordinator
        .select_file(common::sized_file("second.exe", 8192), SelectionSource::Drop)
        .expect("small file should be accepted");
    let handoff = coordinator
        .complete_submit(Ok(common::handle("job-42")))
        .expect("success should hand off");

    assert_eq!(handoff.file_name, "first.exe");
    assert_eq!(handoff.file_size, 4096);
}

#[test]
fn upload_coordinator_tests_skip_reasons_have_readable_text() {
    assert_eq!(
        SkipReason::BackendOffline.to_string(),
        "the analysis backend is offline"
    );
    assert_eq!(SkipReason::NoFile.to_string(), "no file selected");
    assert_eq!(
        SkipReason::AlreadySubmitting.to_string(),
        "an upload is already in progress"
    );
}
