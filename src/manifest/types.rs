//! Record types stored in the run manifest

use crate::gate::GateDecision;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A referenced input file and its digest at run time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub path: String,
    pub digest: String,
}

/// Policy inputs that shaped the run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taste_profile: Option<FileFingerprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_bible: Option<FileFingerprint>,
    #[serde(default)]
    pub stop_on_qc_fail: bool,
}

/// Resolved provider identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderInputs {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

/// Fingerprinted references to everything the run read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFingerprints {
    #[serde(default)]
    pub config: Option<FileFingerprint>,
    #[serde(default)]
    pub contracts: Option<FileFingerprint>,
    #[serde(default)]
    pub prompts: BTreeMap<String, FileFingerprint>,
    #[serde(default)]
    pub policy: PolicyInputs,
    #[serde(default)]
    pub provider: Option<ProviderInputs>,
}

/// A produced artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub path: String,
    pub digest: String,
    pub bytes: u64,
    pub updated_at: String,
}

/// Kinds of manifest events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RunStarted,
    RunResumed,
    StageStarted,
    Generation,
    StageCompleted,
    ContractViolation,
    StageFailed,
    StateChanged,
    GateRecorded,
    RunStopped,
    RunHalted,
    Superseded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RunStarted => "run_started",
            EventKind::RunResumed => "run_resumed",
            EventKind::StageStarted => "stage_started",
            EventKind::Generation => "generation",
            EventKind::StageCompleted => "stage_completed",
            EventKind::ContractViolation => "contract_violation",
            EventKind::StageFailed => "stage_failed",
            EventKind::StateChanged => "state_changed",
            EventKind::GateRecorded => "gate_recorded",
            EventKind::RunStopped => "run_stopped",
            EventKind::RunHalted => "run_halted",
            EventKind::Superseded => "superseded",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only event entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEvent {
    pub at: String,
    pub kind: EventKind,
    #[serde(default)]
    pub details: Value,
}

/// A recorded gate decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    pub decision: GateDecision,
    pub at: String,
    /// Artifact the decision was parsed from
    pub source: String,
}
