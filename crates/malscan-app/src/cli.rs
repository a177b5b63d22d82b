//! Command-line arguments of the `malscan` binary.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use malscan_ui::Route;

/// Terminal client for the malscan analysis service.
#[derive(Parser, Debug)]
#[command(name = "malscan")]
#[command(about = "Submit files for malware analysis and read their reports", long_about = None)]
pub struct Cli {
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// `malscan` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload a local file and follow its job until the report is ready
    Submit {
        /// File to analyse
        path: PathBuf,
    },

    /// Open a client route: `/`, `/jobs/<id>` or `/reports/<id>`
    Open {
        /// Route to open; defaults to the upload view
        #[arg(value_parser = Route::from_str)]
        route: Option<Route>,
    },

    /// Print the report of a finished job
    Report {
        /// Job identifier
        job_id: String,

        /// Copy the file sha256 to the terminal clipboard
        #[arg(long)]
        copy_sha256: bool,
    },

    /// Print the client version
    Version,
}
