//! Client routes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Navigable client route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Upload,
    /// `/jobs/:jobId`
    Job(String),
    /// `/reports/:jobId`
    Report(String),
}

/// Route parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Path matches no known route.
    #[error("unknown route: {0}")]
    Unknown(String),
    /// A job route is missing its id.
    #[error("missing job id in route: {0}")]
    MissingJobId(String),
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.trim();
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Self::Upload),
            ["jobs", id] => Ok(Self::Job((*id).to_string())),
            ["reports", id] => Ok(Self::Report((*id).to_string())),
            ["jobs"] | ["reports"] => Err(RouteError::MissingJobId(path.to_string())),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("/"),
            Self::Job(id) => write!(f, "/jobs/{id}"),
            Self::Report(id) => write!(f, "/reports/{id}"),
        }
    }
}
