//! Gate decision parsing for the quality review and curator decision artifacts.
//!
//! Decision files are written by people, so a small, fixed set of formatting variants is
//! accepted. Anything that does not match literally resolves to `Unknown`, never to a pass
//! or an approval.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Accepts `Status: PASS`, `**Status:** PASS`, `**Status**: PASS`, each with an optional
/// `-` or `*` bullet.
fn quality_status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^\s*(?:[-*]\s*)?(?:\*\*Status:\*\*|\*\*Status\*\*:|Status:)\s*(PASS|FAIL)\s*$",
        )
        .expect("valid quality status regex")
    })
}

fn curator_approval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*(?:[-*])?\s*Approved\s*:\s*(yes|no|true|false)\s*$")
            .expect("valid curator approval regex")
    })
}

/// The two decision points of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// Quality review of the rendered output
    Qc,
    /// Human curator approval before distribution
    Curator,
}

impl Gate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gate::Qc => "qc",
            Gate::Curator => "curator",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing a quality review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityStatus {
    Pass,
    Fail,
    Unknown,
}

/// Result of parsing a curator decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuratorDecision {
    Approved,
    Veto,
    Unknown,
}

/// A decision as recorded in the run manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
    Pass,
    Fail,
    Approved,
    Veto,
    Unknown,
}

impl GateDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateDecision::Pass => "PASS",
            GateDecision::Fail => "FAIL",
            GateDecision::Approved => "APPROVED",
            GateDecision::Veto => "VETO",
            GateDecision::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QualityStatus> for GateDecision {
    fn from(status: QualityStatus) -> Self {
        match status {
            QualityStatus::Pass => GateDecision::Pass,
            QualityStatus::Fail => GateDecision::Fail,
            QualityStatus::Unknown => GateDecision::Unknown,
        }
    }
}

impl From<CuratorDecision> for GateDecision {
    fn from(decision: CuratorDecision) -> Self {
        match decision {
            CuratorDecision::Approved => GateDecision::Approved,
            CuratorDecision::Veto => GateDecision::Veto,
            CuratorDecision::Unknown => GateDecision::Unknown,
        }
    }
}

/// Parse PASS/FAIL from a quality review; the first matching status line wins
pub fn parse_quality_status(text: &str) -> QualityStatus {
    let Some(captures) = quality_status_re().captures(text) else {
        return QualityStatus::Unknown;
    };
    match captures[1].to_ascii_uppercase().as_str() {
        "PASS" => QualityStatus::Pass,
        "FAIL" => QualityStatus::Fail,
        _ => QualityStatus::Unknown,
    }
}

/// Parse the curator's `Approved:` field
pub fn parse_curator_approval(text: &str) -> CuratorDecision {
    let Some(captures) = curator_approval_re().captures(text) else {
        return CuratorDecision::Unknown;
    };
    match captures[1].to_ascii_lowercase().as_str() {
        "yes" | "true" => CuratorDecision::Approved,
        "no" | "false" => CuratorDecision::Veto,
        _ => CuratorDecision::Unknown,
    }
}
