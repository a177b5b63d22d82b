//! Report view loading.

use malscan_transport::AnalysisTransport;
use malscan_ui::ReportViewState;
use tracing::{info, warn};

use crate::redact_sensitive;

/// Fetches the report of `job_id` exactly once and returns the view state.
pub async fn load_report(transport: &dyn AnalysisTransport, job_id: &str) -> ReportViewState {
    let state = ReportViewState::from_fetch(transport.fetch_report(job_id).await);
    match &state {
        ReportViewState::Loaded(report) => {
            info!(%job_id, verdict = %report.verdict, score = report.score, "report loaded");
        }
        ReportViewState::Error(message) => {
            warn!(%job_id, error = %redact_sensitive(message), "report fetch failed");
        }
        ReportViewState::Loading => {}
    }
    state
}
