//! Route resolution for the text front end.

use std::io::Write;
use std::sync::Arc;

use malscan_core::{SubmittedFile, format_megabytes};
use malscan_transport::AnalysisTransport;
use malscan_ui::{
    HealthState, Route, SelectionSource, UploadContext, UploadCoordinator, render_tracker,
};
use tracing::info;

use crate::{
    AppError, Clipboard, ClientConfig, CopyConfirmation, HealthMonitor, PollSettings,
    SubmitOutcome, TrackingSession, load_report, submit_selected,
};

/// Resolves client routes into rendered views written to `out`.
pub struct Navigator {
    transport: Arc<dyn AnalysisTransport>,
    config: ClientConfig,
    clipboard: Arc<dyn Clipboard>,
}

impl Navigator {
    /// Creates a navigator over a shared transport.
    pub fn new(
        transport: Arc<dyn AnalysisTransport>,
        config: ClientConfig,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            transport,
            config,
            clipboard,
        }
    }

    /// Opens `route` and writes its view.
    ///
    /// A job route follows the report hand-off when the job finishes.
    ///
    /// # Errors
    /// Returns [`AppError::Io`] when `out` cannot be written.
    pub async fn open(&self, route: &Route, out: &mut impl Write) -> Result<(), AppError> {
        info!(%route, "navigating");
        match route {
            Route::Upload => self.show_upload(out).await,
            Route::Job(job_id) => self.track_job(job_id, None, out).await,
            Route::Report(job_id) => self.show_report(job_id, false, out).await,
        }
    }

    /// Selects, validates, and submits a local file, then tracks the job.
    ///
    /// # Errors
    /// Returns [`AppError::Core`] when the file cannot be inspected,
    /// [`AppError::Validation`] when it exceeds the size ceiling, and
    /// [`AppError::Io`] when `out` cannot be written.
    pub async fn submit_path(
        &self,
        path: &std::path::Path,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        let candidate = SubmittedFile::from_path(path)?;
        let mut coordinator = UploadCoordinator::new();
        coordinator.select_file(candidate, SelectionSource::Picker)?;

        let monitor = HealthMonitor::spawn(self.transport.clone(), self.config.health_interval);
        let health = monitor.first_probe().await;
        writeln!(out, "Backend: {health}")?;

        match submit_selected(&mut coordinator, self.transport.as_ref(), health).await {
            SubmitOutcome::Skipped(reason) => {
                writeln!(out, "Submission skipped: {reason}")?;
                Ok(())
            }
            SubmitOutcome::Rejected(message) => {
                writeln!(out, "Error: {message}")?;
                Ok(())
            }
            SubmitOutcome::Accepted(handoff) => {
                drop(monitor);
                let route = Route::Job(handoff.job.job_id.clone());
                writeln!(out, "Submitted; tracking {route}")?;
                let context = UploadContext {
                    file_name: handoff.file_name,
                    file_size: handoff.file_size,
                };
                self.track_job(&handoff.job.job_id, Some(context), out).await
            }
        }
    }

    /// Loads and prints a report, optionally copying its sha256.
    ///
    /// # Errors
    /// Returns [`AppError::Io`] when `out` cannot be written.
    pub async fn show_report(
        &self,
        job_id: &str,
        copy_sha256: bool,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        let state = load_report(self.transport.as_ref(), job_id).await;
        write!(out, "{}", state.render())?;

        if let (true, Some(report)) = (copy_sha256, state.report()) {
            let mut confirmation = CopyConfirmation::new(self.clipboard.clone());
            confirmation.copy(&report.file.sha256);
            writeln!(out, "{}", confirmation.state().label())?;
        }
        Ok(())
    }

    async fn show_upload(&self, out: &mut impl Write) -> Result<(), AppError> {
        let monitor = HealthMonitor::spawn(self.transport.clone(), self.config.health_interval);
        let health = monitor.first_probe().await;

        writeln!(out, "Backend: {health}")?;
        writeln!(
            out,
            "Submit a file up to {} MB with: malscan submit <path>",
            format_megabytes(malscan_core::MAX_UPLOAD_BYTES)
        )?;
        if health == HealthState::Offline {
            writeln!(out, "Submission is disabled while the backend is offline.")?;
        }
        Ok(())
    }

    async fn track_job(
        &self,
        job_id: &str,
        context: Option<UploadContext>,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        let mut session = TrackingSession::start(
            self.transport.clone(),
            job_id,
            PollSettings::from(&self.config),
        );
        let report_ready = session.take_report_ready();
        let mut updates = session.subscribe();

        loop {
            let state = updates.borrow_and_update().clone();
            writeln!(out, "{}", render_tracker(job_id, &state, context.as_ref()))?;
            if state.is_terminal() || updates.changed().await.is_err() {
                break;
            }
        }

        let Some(report_ready) = report_ready else {
            return Ok(());
        };
        match report_ready.await {
            Ok(done_job) => {
                writeln!(out, "Opening {}", Route::Report(done_job.clone()))?;
                self.show_report(&done_job, false, out).await
            }
            Err(_) => Ok(()),
        }
    }
}
