//! Upload selection state and submission gating.

use std::fmt;

use malscan_core::{JobHandle, SubmittedFile, ValidationError, validate_upload_size};
use malscan_transport::TransportError;

use crate::HealthState;

/// Input path a file arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Dropped onto the upload zone.
    Drop,
    /// Chosen with the file picker.
    Picker,
}

/// Coarse upload view phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// No file selected.
    Empty,
    /// A valid file is selected.
    Selected,
    /// Upload in flight.
    Submitting,
}

/// Why a submit request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No file is selected.
    NoFile,
    /// An upload is already in flight.
    AlreadySubmitting,
    /// The health monitor reports the backend offline.
    BackendOffline,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoFile => "no file selected",
            Self::AlreadySubmitting => "an upload is already in progress",
            Self::BackendOffline => "the analysis backend is offline",
        })
    }
}

/// Context handed to the tracking view after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadHandoff {
    /// Handle returned by the backend.
    pub job: JobHandle,
    /// Uploaded file name.
    pub file_name: String,
    /// Uploaded file size in bytes.
    pub file_size: u64,
}

/// Selection and submission state of the upload view.
#[derive(Debug, Clone, Default)]
pub struct UploadCoordinator {
    file: Option<SubmittedFile>,
    error: Option<String>,
    in_flight: Option<SubmittedFile>,
}

impl UploadCoordinator {
    /// Creates an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected file.
    pub fn file(&self) -> Option<&SubmittedFile> {
        self.file.as_ref()
    }

    /// Inline error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current phase.
    pub fn phase(&self) -> UploadPhase {
        match (&self.in_flight, &self.file) {
            (Some(_), _) => UploadPhase::Submitting,
            (None, Some(_)) => UploadPhase::Selected,
            (None, None) => UploadPhase::Empty,
        }
    }

    /// Validates and selects a candidate file.
    ///
    /// Both input paths go through the same size check. On rejection the
    /// previous selection is kept and the error overlay is set.
    ///
    /// # Errors
    /// Returns [`ValidationError::FileTooLarge`] above the upload ceiling.
    pub fn select_file(
        &mut self,
        candidate: SubmittedFile,
        _source: SelectionSource,
    ) -> Result<(), ValidationError> {
        if let Err(error) = validate_upload_size(candidate.byte_size) {
            self.error = Some(error.to_string());
            return Err(error);
        }

        self.error = None;
        self.file = Some(candidate);
        Ok(())
    }

    /// Returns `true` when [`Self::begin_submit`] would start an upload.
    pub fn can_submit(&self, health: HealthState) -> bool {
        self.file.is_some() && self.in_flight.is_none() && health.allows_submission()
    }

    /// Enters `Submitting` and returns the file to upload.
    ///
    /// # Errors
    /// Returns the [`SkipReason`] when submission must be a no-op; state is
    /// left untouched in that case.
    pub fn begin_submit(&mut self, health: HealthState) -> Result<SubmittedFile, SkipReason> {
        if self.in_flight.is_some() {
            return Err(SkipReason::AlreadySubmitting);
        }
        if !health.allows_submission() {
            return Err(SkipReason::BackendOffline);
        }
        let file = self.file.clone().ok_or(SkipReason::NoFile)?;

        self.in_flight = Some(file.clone());
        self.error = None;
        Ok(file)
    }

    /// Applies the upload outcome.
    ///
    /// The hand-off describes the file captured by [`Self::begin_submit`],
    /// even if another file was selected while the upload was in flight.
    /// Success discards the selection and returns the hand-off for the
    /// tracking view. Failure sets the error overlay and returns to
    /// `Selected`.
    pub fn complete_submit(
        &mut self,
        outcome: Result<JobHandle, TransportError>,
    ) -> Option<UploadHandoff> {
        let submitted = self.in_flight.take();
        match outcome {
            Ok(job) => {
                self.file = None;
                Some(UploadHandoff {
                    job,
                    file_name: submitted
                        .as_ref()
                        .map(|file| file.name.clone())
                        .unwrap_or_default(),
                    file_size: submitted.map(|file| file.byte_size).unwrap_or_default(),
                })
            }
            Err(error) => {
                self.error = Some(error.message());
                None
            }
        }
    }
}
