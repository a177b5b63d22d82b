#![warn(missing_docs)]
//! # malscan binary
//!
//! Terminal front end: submits files, follows job progress, and prints reports.

use std::sync::Arc;

use clap::Parser;
use malscan_app::{
    AppError, Cli, ClientConfig, Command, Navigator, Osc52Clipboard, app_version, init_tracing,
};
use malscan_transport::HttpTransport;
use malscan_ui::Route;
use tracing::error;

/// CLI entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    if let Err(error) = init_tracing() {
        eprintln!("{error}");
    }

    if let Err(error) = run(cli.command).await {
        error!(%error, "malscan failed");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    if command == Command::Version {
        println!("malscan {}", app_version());
        return Ok(());
    }

    let config = ClientConfig::from_env()?;
    let transport = Arc::new(HttpTransport::new(
        &config.api_base_url,
        config.http_options(),
    )?);
    let navigator = Navigator::new(transport, config, Arc::new(Osc52Clipboard));
    let mut out = std::io::stdout();

    match command {
        Command::Submit { path } => navigator.submit_path(&path, &mut out).await,
        Command::Open { route } => {
            navigator
                .open(&route.unwrap_or(Route::Upload), &mut out)
                .await
        }
        Command::Report {
            job_id,
            copy_sha256,
        } => navigator.show_report(&job_id, copy_sha256, &mut out).await,
        Command::Version => Ok(()),
    }
}
