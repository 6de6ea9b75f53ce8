//! Run Manifest
//!
//! The persisted provenance record of one run: identity and state history, fingerprints of
//! every input, digests of every output, an append-only event log and the gate decisions.
//! The orchestrator persists it after every state-affecting step, so the file on disk always
//! reflects the last completed step.

pub mod state;
pub mod types;

pub use state::{RunMode, RunState, StateTransition};
pub use types::{
    EventKind, FileFingerprint, GateRecord, InputFingerprints, ManifestEvent, OutputRecord,
    PolicyInputs, ProviderInputs,
};

use crate::error::StorageError;
use crate::gate::{Gate, GateDecision};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Current manifest schema version
pub const SCHEMA_VERSION: u32 = 1;

/// File name of the manifest inside a run directory
pub const MANIFEST_FILE_NAME: &str = "manifest.yaml";

/// UTC timestamp in RFC 3339 with second precision
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Run identity and lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub mode: RunMode,
    pub state: RunState,
    #[serde(default)]
    pub state_history: Vec<StateTransition>,
}

/// The manifest document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub run: RunRecord,
    #[serde(default)]
    pub inputs: InputFingerprints,
    #[serde(default)]
    pub outputs: BTreeMap<String, OutputRecord>,
    #[serde(default)]
    pub events: Vec<ManifestEvent>,
    #[serde(default)]
    pub gates: BTreeMap<String, GateRecord>,
}

impl RunManifest {
    /// Create a manifest for a new run, in `DRAFT`
    pub fn initialize(run_id: impl Into<String>, mode: RunMode, inputs: InputFingerprints) -> Self {
        let now = timestamp_now();
        let mut manifest = Self {
            schema_version: SCHEMA_VERSION,
            run: RunRecord {
                id: run_id.into(),
                created_at: now.clone(),
                updated_at: now.clone(),
                mode,
                state: RunState::Draft,
                state_history: vec![StateTransition {
                    state: RunState::Draft,
                    at: now,
                    reason: "run initialized".to_string(),
                }],
            },
            inputs,
            outputs: BTreeMap::new(),
            events: Vec::new(),
            gates: BTreeMap::new(),
        };
        manifest.record_event(
            EventKind::RunStarted,
            serde_json::json!({ "mode": mode.as_str() }),
        );
        manifest
    }

    pub fn state(&self) -> RunState {
        self.run.state
    }

    /// Mark that a new invocation picked up this manifest
    pub fn begin_invocation(&mut self, mode: RunMode) {
        self.run.mode = mode;
        let kind = match mode {
            RunMode::Full => EventKind::RunStarted,
            RunMode::Resume => EventKind::RunResumed,
        };
        self.record_event(
            kind,
            serde_json::json!({ "mode": mode.as_str(), "state": self.run.state.as_str() }),
        );
    }

    /// Insert or replace the output record for `key`
    pub fn record_output(&mut self, key: &str, path: impl Into<String>, digest: String, bytes: u64) {
        let now = timestamp_now();
        self.outputs.insert(
            key.to_string(),
            OutputRecord {
                path: path.into(),
                digest,
                bytes,
                updated_at: now.clone(),
            },
        );
        self.run.updated_at = now;
    }

    /// Append an event
    pub fn record_event(&mut self, kind: EventKind, details: Value) {
        let now = timestamp_now();
        self.events.push(ManifestEvent {
            at: now.clone(),
            kind,
            details,
        });
        self.run.updated_at = now;
    }

    /// Insert or replace the decision for `gate`
    pub fn record_gate(&mut self, gate: Gate, decision: GateDecision, source: impl Into<String>) {
        let now = timestamp_now();
        let source = source.into();
        self.gates.insert(
            gate.as_str().to_string(),
            GateRecord {
                decision,
                at: now.clone(),
                source: source.clone(),
            },
        );
        self.record_event(
            EventKind::GateRecorded,
            serde_json::json!({
                "gate": gate.as_str(),
                "decision": decision.as_str(),
                "source": source,
            }),
        );
    }

    /// Drop gate decisions and outputs that no longer describe the run's artifacts
    ///
    /// Records a `superseded` event naming what was dropped. Returns `false`, with no event,
    /// when none of them were present.
    pub fn supersede(&mut self, gates: &[Gate], outputs: &[&str]) -> bool {
        let dropped_gates: Vec<&str> = gates
            .iter()
            .filter(|gate| self.gates.remove(gate.as_str()).is_some())
            .map(|gate| gate.as_str())
            .collect();
        let dropped_outputs: Vec<&str> = outputs
            .iter()
            .copied()
            .filter(|key| self.outputs.remove(*key).is_some())
            .collect();
        if dropped_gates.is_empty() && dropped_outputs.is_empty() {
            return false;
        }
        self.record_event(
            EventKind::Superseded,
            serde_json::json!({ "gates": dropped_gates, "outputs": dropped_outputs }),
        );
        true
    }

    /// Transition to `state`, appending to history
    ///
    /// Returns `false` without touching history when the run is already in `state`.
    pub fn set_state(&mut self, state: RunState, reason: impl Into<String>) -> bool {
        if self.run.state == state {
            return false;
        }
        let from = self.run.state;
        let reason = reason.into();
        self.run.state = state;
        self.run.state_history.push(StateTransition {
            state,
            at: timestamp_now(),
            reason: reason.clone(),
        });
        self.record_event(
            EventKind::StateChanged,
            serde_json::json!({
                "from": from.as_str(),
                "to": state.as_str(),
                "reason": reason,
            }),
        );
        true
    }

    pub fn gate(&self, gate: Gate) -> Option<&GateRecord> {
        self.gates.get(gate.as_str())
    }

    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &ManifestEvent> {
        self.events.iter().filter(move |event| event.kind == kind)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Write the manifest to `path`, replacing any previous version
    ///
    /// Writes go to a sibling temp file first and are renamed into place.
    pub fn persist(&self, path: &Path) -> Result<(), StorageError> {
        let yaml = self.to_yaml().map_err(|e| StorageError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::write(parent, e))?;
        }

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml).map_err(|e| StorageError::write(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::write(path, e)
        })?;
        Ok(())
    }

    /// Load a manifest from `path`
    ///
    /// Returns `None` if the file doesn't exist and an error if it exists but does not parse.
    pub fn load(path: &Path) -> Result<Option<Self>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).map_err(|e| StorageError::read(path, e))?;
        let manifest = serde_yaml::from_str(&raw).map_err(|e| StorageError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Some(manifest))
    }
}
