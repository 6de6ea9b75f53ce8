//! Per-invocation run context: the run's layout and manifest, owned by the orchestrator
//! and handed to each step by `&mut`.

use crate::error::StorageError;
use crate::manifest::{EventKind, RunManifest, RunState};
use crate::layout::RunLayout;
use crate::stage::Stage;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Result of one orchestrator invocation
///
/// Gate halts are outcomes, not errors: the run stopped cleanly in `state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub run_id: String,
    pub run_dir: PathBuf,
    pub state: RunState,
    /// Stages executed by this invocation, in order
    pub stages_executed: Vec<Stage>,
}

pub struct RunContext {
    pub layout: RunLayout,
    pub manifest: RunManifest,
    stages_executed: Vec<Stage>,
}

impl RunContext {
    pub fn new(layout: RunLayout, manifest: RunManifest) -> Self {
        Self {
            layout,
            manifest,
            stages_executed: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.manifest.run.id
    }

    pub fn persist(&self) -> Result<(), StorageError> {
        self.manifest.persist(&self.layout.manifest_path())
    }

    /// Move to `state` and persist before returning
    ///
    /// A transition to the current state changes nothing and returns `false`.
    pub fn transition(&mut self, state: RunState, reason: &str) -> Result<bool, StorageError> {
        let from = self.manifest.state();
        if !self.manifest.set_state(state, reason) {
            return Ok(false);
        }
        info!(
            run_id = %self.manifest.run.id,
            from = %from,
            to = %state,
            reason,
            "Run state changed"
        );
        self.persist()?;
        Ok(true)
    }

    /// Append an event and persist
    pub fn record_event(&mut self, kind: EventKind, details: Value) -> Result<(), StorageError> {
        self.manifest.record_event(kind, details);
        self.persist()
    }

    pub(crate) fn mark_executed(&mut self, stage: Stage) {
        self.stages_executed.push(stage);
    }

    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            run_id: self.manifest.run.id.clone(),
            run_dir: self.layout.run_dir().to_path_buf(),
            state: self.manifest.state(),
            stages_executed: self.stages_executed,
        }
    }
}
