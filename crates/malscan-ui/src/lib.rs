#![warn(missing_docs)]
//! # malscan-ui
//!
//! ## Purpose
//! Defines the view-facing state machines of the `malscan` client.
//!
//! ## Responsibilities
//! - Hold upload selection state and gate submission ([`UploadCoordinator`]).
//! - Interpret polled job status through a pure transition function
//!   ([`transition`] over [`TrackerState`]).
//! - Represent report view states ([`ReportViewState`]) and backend
//!   reachability ([`HealthState`]).
//! - Parse and print the three client routes ([`Route`]).
//!
//! ## Data flow
//! Runtime orchestration feeds transport outcomes into these types; the types
//! decide the next state and produce display text. Nothing here performs I/O
//! or owns a timer, so every transition is unit-testable without a clock.
//!
//! ## Ownership and lifetimes
//! States own their snapshots. A new snapshot replaces the previous one; no
//! state is shared between tracking sessions.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors: transport
//! failures become `Error` states with a message and a route back to `/`.

mod health;
mod report_view;
mod route;
mod tracker;
mod upload;

pub use health::HealthState;
pub use report_view::{CopyState, ReportViewState};
pub use route::{Route, RouteError};
pub use tracker::{
    GENERIC_FAILURE_MESSAGE, TrackerState, UploadContext, render_tracker, transition,
};
pub use upload::{SelectionSource, SkipReason, UploadCoordinator, UploadHandoff, UploadPhase};

/// Link text offered on every error screen.
pub const BACK_TO_UPLOAD: &str = "Back to upload: /";
