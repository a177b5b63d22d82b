//! Read-only display label dictionaries.

/// Immutable key -> display label mapping with raw-key fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDictionary {
    entries: &'static [(&'static str, &'static str)],
}

impl LabelDictionary {
    /// Creates a dictionary over static entries.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Returns the label for `key`, if the key is known.
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(entry_key, _)| *entry_key == key)
            .map(|(_, label)| *label)
    }

    /// Returns the label for `key`, or `key` itself when unknown.
    pub fn label<'a>(&self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    /// Returns all known keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }
}

/// Verdict code labels.
pub static VERDICT_LABELS: LabelDictionary = LabelDictionary::new(&[
    ("clean", "Clean"),
    ("suspicious", "Suspicious"),
    ("malicious", "Malicious"),
    ("unknown", "Unknown"),
]);

/// Pipeline stage labels.
pub static STAGE_LABELS: LabelDictionary = LabelDictionary::new(&[
    ("file-type", "File type detection"),
    ("clamav", "ClamAV scan"),
    ("yara", "YARA rule matching"),
    ("ioc-extract", "IOC extraction"),
    ("sandbox", "Sandbox analysis"),
]);

/// Job status labels.
pub static STATUS_LABELS: LabelDictionary = LabelDictionary::new(&[
    ("queued", "Queued"),
    ("scanning", "Scanning"),
    ("done", "Done"),
    ("failed", "Failed"),
]);
