#![warn(missing_docs)]
//! # malscan-app
//!
//! ## Purpose
//! Runs the `malscan` client: configuration, logging, background timers, and
//! the navigation between the upload, tracking, and report views.
//!
//! ## Responsibilities
//! - Load [`ClientConfig`] from the environment.
//! - Own every timer-driven task behind a guard that aborts it on drop
//!   ([`HealthMonitor`], [`TrackingSession`], [`CopyConfirmation`]).
//! - Drive the pure state machines of `malscan-ui` with transport outcomes.
//! - Resolve client routes into rendered views ([`Navigator`]).
//!
//! ## Data flow
//! Upload view -> [`submit_selected`] -> job route -> [`TrackingSession`]
//! (repeated status fetches) -> one-shot report hand-off -> [`load_report`]
//! -> rendered report. [`HealthMonitor`] runs alongside and only gates
//! submission.
//!
//! ## Ownership and lifetimes
//! Sessions share the transport through `Arc<dyn AnalysisTransport>` and
//! nothing else. Each session publishes its state through a `watch` channel
//! it owns; dropping the session aborts its task, so no request is issued for
//! a view that no longer exists.
//!
//! ## Error model
//! Startup and I/O failures surface as [`AppError`]. Transport failures
//! during a session become display state and never abort the process.
//!
//! ## Security and privacy notes
//! - Error bodies pass through [`redact_sensitive`] before being logged.
//! - A non-HTTPS backend URL is accepted but logged as a warning.

mod cli;
mod clipboard;
mod config;
mod health_monitor;
mod logging;
mod navigator;
mod report_viewer;
mod tracking;
mod upload;

use malscan_core::{CoreError, ValidationError};
use malscan_transport::TransportError;
use malscan_ui::RouteError;
use thiserror::Error;

pub use cli::{Cli, Command};
pub use clipboard::{
    COPY_CONFIRMATION_WINDOW, Clipboard, ClipboardError, CopyConfirmation, Osc52Clipboard,
    osc52_sequence,
};
pub use config::{ClientConfig, ConfigError, is_https_endpoint};
pub use health_monitor::HealthMonitor;
pub use logging::{init_tracing, redact_sensitive};
pub use navigator::Navigator;
pub use report_viewer::load_report;
pub use tracking::{PollSettings, TrackingSession};
pub use upload::{SubmitOutcome, local_sha256, submit_selected};

/// Build-time application version loaded from the root `VERSION` file.
pub const APP_VERSION: &str = env!("MALSCAN_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Transport could not be constructed or failed outside a session.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Local file could not be inspected.
    #[error("file error: {0}")]
    Core(#[from] CoreError),
    /// Local file failed pre-submission validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// Route string is not a known client route.
    #[error("route error: {0}")]
    Route(#[from] RouteError),
    /// Output could not be written.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    /// Global tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}
