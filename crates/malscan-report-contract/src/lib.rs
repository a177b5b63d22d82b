#![warn(missing_docs)]
//! # malscan-report-contract
//!
//! ## Purpose
//! Defines the analysis report schema returned by the backend and the
//! deterministic, display-ready projection of it.
//!
//! ## Responsibilities
//! - Parse report payloads (snake_case wire names) into owned structs.
//! - Map verdict, stage, and job-status codes to display labels with a raw-key
//!   fallback for forward compatibility.
//! - Render a report into ordered sections, omitting empty ones.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_report`] -> [`render_report`] ->
//! [`ReportDocument`] shown by the report view.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs to avoid borrowing from transient network
//! buffers. Rendering copies what it displays so the document outlives the
//! report if needed.
//!
//! ## Error model
//! Invalid JSON or violated invariants return [`ReportContractError`].
//! Rendering itself is infallible.

mod labels;
mod render;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use labels::{LabelDictionary, STAGE_LABELS, STATUS_LABELS, VERDICT_LABELS};
pub use render::{
    AvLine, FileSection, IndicatorGroup, IndicatorSection, MOCK_SANDBOX_NOTICE,
    NO_INDICATORS_MESSAGE, ReportDocument, SandboxSection, TimingRow, TimingSection, VerdictLine,
    YaraLine, format_kilobytes, render_report,
};

/// Upper bound of the verdict score scale.
pub const MAX_SCORE: u32 = 100;

/// Terminal analysis artifact for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Job identifier.
    pub job_id: String,
    /// Metadata of the analysed file.
    pub file: FileMetadata,
    /// Verdict code (`clean`, `suspicious`, `malicious`, `unknown`, or newer).
    pub verdict: String,
    /// Risk score in `0..=100`.
    pub score: u32,
    /// Per-engine results.
    pub results: AnalysisResults,
    /// Stage timings.
    pub timings: Timings,
    /// Report creation time; stored results may omit it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// File metadata block of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Server-side file identifier.
    pub file_id: String,
    /// sha256 hex digest.
    pub sha256: String,
    /// Detected MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// File name as uploaded.
    pub original_filename: String,
}

/// Results of all analysis engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// Antivirus result.
    pub av_result: AvResult,
    /// YARA rule matches.
    #[serde(default)]
    pub yara_hits: Vec<YaraHit>,
    /// Extracted indicators.
    pub iocs: Indicators,
    /// Dynamic analysis result.
    pub sandbox: SandboxResult,
}

/// Antivirus engine result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvResult {
    /// Engine name.
    pub engine: String,
    /// Whether the engine flagged the file.
    pub infected: bool,
    /// Signature name when infected.
    #[serde(default)]
    pub threat_name: Option<String>,
}

/// One YARA rule match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YaraHit {
    /// Rule name.
    pub rule: String,
    /// Rule namespace.
    pub namespace: String,
    /// Rule description from metadata.
    #[serde(default)]
    pub description: String,
    /// Rule severity from metadata.
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Rule author from metadata.
    #[serde(default)]
    pub author: String,
    /// Rule tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Matched string identifiers in match order.
    #[serde(default, rename = "strings")]
    pub matched_strings: Vec<String>,
}

fn default_severity() -> String {
    "medium".to_string()
}

/// Indicators of compromise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicators {
    /// Extracted URLs.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Extracted domains.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Extracted IP addresses.
    #[serde(default)]
    pub ips: Vec<String>,
    /// Content hashes of the file.
    pub hashes: FileHashes,
}

impl Indicators {
    /// Returns `true` when no URL, domain, or IP indicator was extracted.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.domains.is_empty() && self.ips.is_empty()
    }
}

/// Content hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHashes {
    /// md5 hex digest.
    pub md5: String,
    /// sha1 hex digest.
    pub sha1: String,
    /// sha256 hex digest.
    pub sha256: String,
}

/// Sandbox execution result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxResult {
    /// Whether the sample was executed.
    pub executed: bool,
    /// Observed behaviors in order.
    #[serde(default)]
    pub behaviors: Vec<SandboxBehavior>,
    /// Observed outbound connections in order.
    #[serde(default)]
    pub network_connections: Vec<NetworkConnection>,
    /// `true` when the section is placeholder data.
    pub is_mock: bool,
}

/// One sandbox behavior entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxBehavior {
    /// Behavior type (for example `file_write`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Filesystem path involved.
    #[serde(default)]
    pub path: Option<String>,
    /// Registry key involved.
    #[serde(default, rename = "key")]
    pub registry_key: Option<String>,
}

/// One sandbox network connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConnection {
    /// Destination address.
    #[serde(rename = "dst_ip")]
    pub destination_ip: String,
    /// Destination port.
    #[serde(rename = "dst_port")]
    pub destination_port: u16,
    /// Transport protocol.
    pub protocol: String,
}

/// Timing summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Total pipeline duration.
    pub total_ms: u64,
    /// Per-stage durations in execution order.
    #[serde(default)]
    pub stages: Vec<StageTiming>,
}

/// Duration of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    /// Stage key (`file-type`, `clamav`, ...).
    pub name: String,
    /// Stage outcome.
    pub status: String,
    /// Stage duration.
    pub duration_ms: u64,
}

/// Parses raw JSON into a validated report.
///
/// # Errors
/// Returns [`ReportContractError::Decode`] for invalid JSON.
/// Returns [`ReportContractError::InvalidContract`] when `job_id` is blank or
/// the score is outside `0..=100`.
pub fn parse_report(raw: &[u8]) -> Result<Report, ReportContractError> {
    let report: Report = serde_json::from_slice(raw).map_err(ReportContractError::Decode)?;

    if report.job_id.trim().is_empty() {
        return Err(ReportContractError::InvalidContract(
            "job_id is empty".to_string(),
        ));
    }

    if report.score > MAX_SCORE {
        return Err(ReportContractError::InvalidContract(format!(
            "score {} is outside 0..={MAX_SCORE}",
            report.score
        )));
    }

    Ok(report)
}

/// Report contract errors.
#[derive(Debug, Error)]
pub enum ReportContractError {
    /// JSON decode failure.
    #[error("report decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("report contract violation: {0}")]
    InvalidContract(String),
}
