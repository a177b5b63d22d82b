//! Report view states.

use malscan_report_contract::{Report, render_report};
use malscan_transport::TransportError;

use crate::BACK_TO_UPLOAD;

/// Report view state. The report is fetched once per view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReportViewState {
    /// Fetch in flight.
    #[default]
    Loading,
    /// Fetch failed.
    Error(String),
    /// Report available.
    Loaded(Box<Report>),
}

impl ReportViewState {
    /// Builds the state from the single fetch outcome.
    pub fn from_fetch(outcome: Result<Report, TransportError>) -> Self {
        match outcome {
            Ok(report) => Self::Loaded(Box::new(report)),
            Err(error) => Self::Error(error.message()),
        }
    }

    /// Returns the loaded report.
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Loaded(report) => Some(report),
            _ => None,
        }
    }

    /// Renders the view as plain text.
    pub fn render(&self) -> String {
        match self {
            Self::Loading => "Loading report...\n".to_string(),
            Self::Error(message) => format!("Error: {message}\n{BACK_TO_UPLOAD}\n"),
            Self::Loaded(report) => render_report(report).to_string(),
        }
    }
}

/// Confirmation shown after copying the sha256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    /// Copy action available.
    #[default]
    Idle,
    /// Digest was copied; reverts to `Idle` after a short delay.
    Copied,
}

impl CopyState {
    /// Text of the copy action.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Copy SHA256",
            Self::Copied => "Copied",
        }
    }
}
