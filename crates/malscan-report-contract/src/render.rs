//! Deterministic projection of a [`Report`] into display sections.

use std::fmt;

use crate::labels::{STAGE_LABELS, VERDICT_LABELS};
use crate::{Report, SandboxBehavior};

/// Shown when no URL, domain, or IP indicator was extracted.
pub const NO_INDICATORS_MESSAGE: &str = "No indicators found";

/// Shown when the sandbox section is placeholder data.
pub const MOCK_SANDBOX_NOTICE: &str =
    "Sandbox results are placeholder data; no dynamic execution was performed.";

/// Fully rendered report, sections in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// Verdict headline.
    pub verdict: VerdictLine,
    /// File metadata block.
    pub file: FileSection,
    /// Antivirus result line.
    pub av: AvLine,
    /// YARA matches; `None` when there are none.
    pub yara: Option<Vec<YaraLine>>,
    /// Indicator groups.
    pub indicators: IndicatorSection,
    /// Behaviors and connections of a real sandbox run.
    pub sandbox: Option<SandboxSection>,
    /// Stage timings and total.
    pub timings: TimingSection,
    /// Placeholder notice when the sandbox data is mocked.
    pub mock_notice: Option<&'static str>,
}

/// Verdict headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictLine {
    /// Raw verdict code.
    pub code: String,
    /// Display label, or the raw code when unrecognized.
    pub label: String,
    /// Risk score.
    pub score: u32,
}

/// File metadata rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    /// Uploaded file name.
    pub file_name: String,
    /// MIME type.
    pub mime: String,
    /// Size formatted as kilobytes.
    pub size: String,
    /// sha256 digest (the copy-to-clipboard target).
    pub sha256: String,
    /// md5 digest.
    pub md5: String,
    /// sha1 digest.
    pub sha1: String,
}

/// Antivirus result line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvLine {
    /// Engine name.
    pub engine: String,
    /// Whether a threat was detected.
    pub infected: bool,
    /// Outcome text.
    pub text: String,
}

/// One YARA match line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YaraLine {
    /// Rule name.
    pub rule: String,
    /// Comma-separated tags.
    pub tags: String,
}

/// Indicator groups, each present only when non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSection {
    /// Non-empty groups in URL, domain, IP order.
    pub groups: Vec<IndicatorGroup>,
    /// Set only when every group is empty.
    pub empty_notice: Option<&'static str>,
}

/// One indicator group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorGroup {
    /// Group title (`URLs`, `Domains`, `IPs`).
    pub title: &'static str,
    /// Values in server order.
    pub values: Vec<String>,
}

/// Real sandbox observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxSection {
    /// One line per behavior.
    pub behaviors: Vec<String>,
    /// One line per network connection.
    pub connections: Vec<String>,
}

/// Stage timing list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingSection {
    /// Rows in stage order.
    pub rows: Vec<TimingRow>,
    /// Total duration.
    pub total_ms: u64,
}

/// One stage timing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRow {
    /// Stage label, or the raw stage key when unknown.
    pub label: String,
    /// Stage duration.
    pub duration_ms: u64,
}

/// Formats a byte count as kilobytes with two decimals.
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Renders a report into display sections.
///
/// Same input always yields the same document.
pub fn render_report(report: &Report) -> ReportDocument {
    let results = &report.results;

    let av = &results.av_result;
    let av_text = if av.infected {
        format!(
            "Threat detected: {}",
            av.threat_name.as_deref().unwrap_or("unnamed threat")
        )
    } else {
        "No threats detected".to_string()
    };

    let yara = if results.yara_hits.is_empty() {
        None
    } else {
        Some(
            results
                .yara_hits
                .iter()
                .map(|hit| YaraLine {
                    rule: hit.rule.clone(),
                    tags: hit.tags.iter().cloned().collect::<Vec<_>>().join(", "),
                })
                .collect(),
        )
    };

    let iocs = &results.iocs;
    let groups = [("URLs", &iocs.urls), ("Domains", &iocs.domains), ("IPs", &iocs.ips)]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(title, values)| IndicatorGroup {
            title,
            values: values.clone(),
        })
        .collect::<Vec<_>>();
    let empty_notice = groups.is_empty().then_some(NO_INDICATORS_MESSAGE);

    let sandbox = &results.sandbox;
    let sandbox_section = (sandbox.executed
        && !sandbox.is_mock
        && (!sandbox.behaviors.is_empty() || !sandbox.network_connections.is_empty()))
    .then(|| SandboxSection {
        behaviors: sandbox.behaviors.iter().map(behavior_line).collect(),
        connections: sandbox
            .network_connections
            .iter()
            .map(|connection| {
                format!(
                    "{} {}:{}",
                    connection.protocol, connection.destination_ip, connection.destination_port
                )
            })
            .collect(),
    });

    ReportDocument {
        verdict: VerdictLine {
            code: report.verdict.clone(),
            label: VERDICT_LABELS.label(&report.verdict).to_string(),
            score: report.score,
        },
        file: FileSection {
            file_name: report.file.original_filename.clone(),
            mime: report.file.mime.clone(),
            size: format_kilobytes(report.file.size),
            sha256: report.file.sha256.clone(),
            md5: iocs.hashes.md5.clone(),
            sha1: iocs.hashes.sha1.clone(),
        },
        av: AvLine {
            engine: av.engine.clone(),
            infected: av.infected,
            text: av_text,
        },
        yara,
        indicators: IndicatorSection {
            groups,
            empty_notice,
        },
        sandbox: sandbox_section,
        timings: TimingSection {
            rows: report
                .timings
                .stages
                .iter()
                .map(|stage| TimingRow {
                    label: STAGE_LABELS.label(&stage.name).to_string(),
                    duration_ms: stage.duration_ms,
                })
                .collect(),
            total_ms: report.timings.total_ms,
        },
        mock_notice: sandbox.is_mock.then_some(MOCK_SANDBOX_NOTICE),
    }
}

fn behavior_line(behavior: &SandboxBehavior) -> String {
    match (&behavior.path, &behavior.registry_key) {
        (Some(path), _) => format!("{} {path}", behavior.kind),
        (None, Some(key)) => format!("{} {key}", behavior.kind),
        (None, None) => behavior.kind.clone(),
    }
}

impl fmt::Display for ReportDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verdict: {}", self.verdict.label)?;
        writeln!(f, "Risk score: {}/100", self.verdict.score)?;

        writeln!(f)?;
        writeln!(f, "File")?;
        writeln!(f, "  Name:   {}", self.file.file_name)?;
        writeln!(f, "  Type:   {}", self.file.mime)?;
        writeln!(f, "  Size:   {}", self.file.size)?;
        writeln!(f, "  SHA256: {}", self.file.sha256)?;
        writeln!(f, "  SHA1:   {}", self.file.sha1)?;
        writeln!(f, "  MD5:    {}", self.file.md5)?;

        writeln!(f)?;
        writeln!(f, "Antivirus")?;
        writeln!(f, "  {}: {}", self.av.engine, self.av.text)?;

        if let Some(lines) = &self.yara {
            writeln!(f)?;
            writeln!(f, "YARA matches")?;
            for line in lines {
                if line.tags.is_empty() {
                    writeln!(f, "  {}", line.rule)?;
                } else {
                    writeln!(f, "  {} [{}]", line.rule, line.tags)?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Indicators")?;
        for group in &self.indicators.groups {
            writeln!(f, "  {} ({})", group.title, group.values.len())?;
            for value in &group.values {
                writeln!(f, "    {value}")?;
            }
        }
        if let Some(notice) = self.indicators.empty_notice {
            writeln!(f, "  {notice}")?;
        }

        if let Some(sandbox) = &self.sandbox {
            writeln!(f)?;
            writeln!(f, "Sandbox")?;
            for line in &sandbox.behaviors {
                writeln!(f, "  behavior: {line}")?;
            }
            for line in &sandbox.connections {
                writeln!(f, "  connection: {line}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Timings")?;
        for row in &self.timings.rows {
            writeln!(f, "  {:<22} {} ms", row.label, row.duration_ms)?;
        }
        writeln!(f, "  {:<22} {} ms", "Total", self.timings.total_ms)?;

        if let Some(notice) = self.mock_notice {
            writeln!(f)?;
            writeln!(f, "Sandbox (mock)")?;
            writeln!(f, "  {notice}")?;
        }

        Ok(())
    }
}
