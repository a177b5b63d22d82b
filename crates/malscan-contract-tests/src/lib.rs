#![warn(missing_docs)]
//! # malscan-contract-tests
//!
//! Locates the frozen wire schemas and fixtures under the workspace
//! `contracts/` directory. The checks themselves live in `tests/`.

use std::path::PathBuf;

/// Schema files frozen for the backend wire contract.
pub const SCHEMA_FILES: [&str; 4] = [
    "upload-response.schema.json",
    "job-status.schema.json",
    "error-envelope.schema.json",
    "report.schema.json",
];

/// Returns the workspace `contracts/` directory.
pub fn contracts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("contracts")
}
