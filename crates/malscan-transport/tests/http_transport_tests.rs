//! Integration tests for the HTTP transport against a canned server.

mod common;

use malscan_core::{JobState, SubmittedFile};
use malscan_transport::{AnalysisTransport, HttpOptions, HttpTransport, TransportError};

const STATUS_FIXTURE: &str = include_str!("../../../contracts/fixtures/job-status.scanning.valid.json");
const UPLOAD_FIXTURE: &str = include_str!("../../../contracts/fixtures/upload-response.valid.json");
const REPORT_FIXTURE: &str = include_str!("../../../contracts/fixtures/report.empty.valid.json");
const WRAPPED_ERROR: &str = include_str!("../../../contracts/fixtures/error-envelope.wrapped.valid.json");

fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(base_url, HttpOptions::default()).expect("transport should build")
}

#[tokio::test]
async fn http_transport_tests_fetch_status_decodes_snapshot() {
    let (base_url, server) = common::serve_once(200, STATUS_FIXTURE).await;

    let status = transport(&base_url)
        .fetch_status("8d7f6c1e-0a2b-4c55-9e11-3f6a2b7c9d01")
        .await
        .expect("status should decode");
    assert_eq!(status.status, JobState::Scanning);
    assert_eq!(status.progress.current_stage.as_deref(), Some("clamav"));

    let request = String::from_utf8(server.await.expect("server should finish")).expect("utf8");
    assert!(request.starts_with("GET /api/v1/jobs/8d7f6c1e-0a2b-4c55-9e11-3f6a2b7c9d01 HTTP/1.1"));
}

#[tokio::test]
async fn http_transport_tests_fetch_report_decodes_report() {
    let (base_url, server) = common::serve_once(200, REPORT_FIXTURE).await;

    let report = transport(&base_url)
        .fetch_report("8d7f6c1e-0a2b-4c55-9e11-3f6a2b7c9d01")
        .await
        .expect("report should decode");
    assert_eq!(report.verdict, "clean");

    let request = String::from_utf8(server.await.expect("server should finish")).expect("utf8");
    assert!(request.starts_with("GET /api/v1/reports/8d7f6c1e-0a2b-4c55-9e11-3f6a2b7c9d01 "));
}

#[tokio::test]
async fn http_transport_tests_bare_and_wrapped_envelopes_yield_same_message() {
    let (bare_url, _bare) = common::serve_once(
        404,
        r#"{"error":{"code":"JOB_NOT_FOUND","message":"m"}}"#,
    )
    .await;
    let (wrapped_url, _wrapped) = common::serve_once(
        404,
        r#"{"detail":{"error":{"code":"JOB_NOT_FOUND","message":"m"}}}"#,
    )
    .await;

    let bare = transport(&bare_url)
        .fetch_status("missing")
        .await
        .expect_err("404 should fail");
    let wrapped = transport(&wrapped_url)
        .fetch_report("missing")
        .await
        .expect_err("404 should fail");

    assert_eq!(bare.message(), "m");
    assert_eq!(wrapped.message(), "m");
    assert_eq!(
        bare,
        TransportError::Api {
            status: 404,
            message: "m".to_string()
        }
    );
}

#[tokio::test]
async fn http_transport_tests_submit_sends_multipart_file_field() {
    let (base_url, server) = common::serve_once(201, UPLOAD_FIXTURE).await;
    let file = SubmittedFile::from_bytes("sample.txt", b"hello malscan".to_vec());

    let handle = transport(&base_url)
        .submit(&file)
        .await
        .expect("upload should succeed");
    assert_eq!(handle.job_id, "8d7f6c1e-0a2b-4c55-9e11-3f6a2b7c9d01");
    assert_eq!(handle.status, JobState::Queued);

    let request = String::from_utf8_lossy(&server.await.expect("server should finish")).into_owned();
    assert!(request.starts_with("POST /api/v1/files HTTP/1.1"));
    assert!(request.contains(r#"name="file"; filename="sample.txt""#));
    assert!(request.contains("hello malscan"));
}

#[tokio::test]
async fn http_transport_tests_submit_failure_unwraps_detail_envelope() {
    let (base_url, _server) = common::serve_once(400, WRAPPED_ERROR).await;
    let file = SubmittedFile::from_bytes("big.bin", vec![0; 32]);

    let error = transport(&base_url)
        .submit(&file)
        .await
        .expect_err("400 should fail");
    assert_eq!(error.message(), "File size exceeds limit");
}

#[tokio::test]
async fn http_transport_tests_submit_failure_without_json_uses_generic_message() {
    let (base_url, _server) = common::serve_once(502, "<html>bad gateway</html>").await;
    let file = SubmittedFile::from_bytes("a.bin", vec![1; 8]);

    let error = transport(&base_url)
        .submit(&file)
        .await
        .expect_err("502 should fail");
    assert_eq!(error.message(), "upload failed");
}

#[tokio::test]
async fn http_transport_tests_malformed_success_body_is_decode_error() {
    let (base_url, _server) = common::serve_once(200, r#"{"job_id":"x"}"#).await;

    let error = transport(&base_url)
        .fetch_status("x")
        .await
        .expect_err("incomplete body should fail");
    assert!(matches!(error, TransportError::Decode(_)));
}

#[tokio::test]
async fn http_transport_tests_health_maps_outcomes_to_bool() {
    let (ok_url, ok_server) = common::serve_once(200, r#"{"status":"ok"}"#).await;
    assert!(transport(&ok_url).check_health().await);
    let request = String::from_utf8(ok_server.await.expect("server should finish")).expect("utf8");
    assert!(request.starts_with("GET /health HTTP/1.1"));

    let (down_url, _down) = common::serve_once(503, r#"{"status":"down"}"#).await;
    assert!(!transport(&down_url).check_health().await);

    let unreachable = common::unreachable_base_url().await;
    assert!(!transport(&unreachable).check_health().await);
}

#[tokio::test]
async fn http_transport_tests_network_failure_is_reported() {
    let unreachable = common::unreachable_base_url().await;
    let error = transport(&unreachable)
        .fetch_status("job")
        .await
        .expect_err("nothing is listening");
    assert!(matches!(error, TransportError::Network(_)));
}
