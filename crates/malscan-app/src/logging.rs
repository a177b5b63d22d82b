//! Tracing setup and log-safe text helpers.

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::AppError;

const SECRET_MARKERS: [&str; 5] = ["password", "token", "authorization", "bearer", "api_key"];

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`; without it, `info` and above are emitted.
///
/// # Errors
/// Returns [`AppError::Logging`] when a global subscriber is already set.
pub fn init_tracing() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|error| AppError::Logging(error.to_string()))
}

/// Redacts everything from the first secret marker onward.
///
/// Backend error bodies are logged verbatim otherwise, so anything that looks
/// like a credential is cut before it reaches a log line.
pub fn redact_sensitive(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let first = SECRET_MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker).map(|position| (position, *marker)))
        .min_by_key(|(position, _)| *position);

    match first {
        Some((position, marker)) => format!("{}{marker}=<redacted>", &input[..position]),
        None => input.to_string(),
    }
}
