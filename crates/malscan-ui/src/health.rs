use std::fmt;

/// Backend reachability as last reported by the health monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthState {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// Last probe answered 2xx.
    Online,
    /// Last probe failed.
    Offline,
}

impl HealthState {
    /// Maps a probe result to a state.
    pub fn from_probe(reachable: bool) -> Self {
        if reachable { Self::Online } else { Self::Offline }
    }

    /// Returns `false` only when the backend is known to be offline.
    pub fn allows_submission(&self) -> bool {
        !matches!(self, Self::Offline)
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "checking backend",
            Self::Online => "backend online",
            Self::Offline => "backend offline",
        })
    }
}
