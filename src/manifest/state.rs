//! Run lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a run
///
/// `DRAFT → RENDERING → QC → {STOPPED_QC_FAIL | READY_FOR_CURATOR}`, then on resume
/// `{CURATOR_VETOED | APPROVED → POST_BUNDLE_READY}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Draft,
    Rendering,
    Qc,
    StoppedQcFail,
    ReadyForCurator,
    CuratorVetoed,
    Approved,
    PostBundleReady,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Draft => "DRAFT",
            RunState::Rendering => "RENDERING",
            RunState::Qc => "QC",
            RunState::StoppedQcFail => "STOPPED_QC_FAIL",
            RunState::ReadyForCurator => "READY_FOR_CURATOR",
            RunState::CuratorVetoed => "CURATOR_VETOED",
            RunState::Approved => "APPROVED",
            RunState::PostBundleReady => "POST_BUNDLE_READY",
        }
    }

    /// States in which an invocation stops and leaves a marker file behind
    pub fn marker_file_name(&self) -> Option<&'static str> {
        match self {
            RunState::StoppedQcFail => Some("STOPPED_QC_FAIL.md"),
            RunState::ReadyForCurator => Some("READY_FOR_CURATOR.md"),
            RunState::CuratorVetoed => Some("CURATOR_VETOED.md"),
            RunState::PostBundleReady => Some("POST_BUNDLE_READY.md"),
            RunState::Draft | RunState::Rendering | RunState::Qc | RunState::Approved => None,
        }
    }

    /// Whether a curator decision may be consumed from this state.
    ///
    /// Only runs whose quality review passed reach the curator; re-running resume after the
    /// decision file changes is allowed and appends to history.
    pub fn accepts_resume(&self) -> bool {
        matches!(
            self,
            RunState::ReadyForCurator
                | RunState::CuratorVetoed
                | RunState::Approved
                | RunState::PostBundleReady
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the current invocation entered the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Full,
    Resume,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Full => "full",
            RunMode::Resume => "resume",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a run's state history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub state: RunState,
    pub at: String,
    #[serde(default)]
    pub reason: String,
}
