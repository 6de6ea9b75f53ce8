//! Status marker files left in the run directory when an invocation halts.

use crate::error::StorageError;
use crate::layout::{self, RunLayout};
use crate::manifest::RunState;
use std::fs;

const MARKER_STATES: [RunState; 4] = [
    RunState::StoppedQcFail,
    RunState::ReadyForCurator,
    RunState::CuratorVetoed,
    RunState::PostBundleReady,
];

fn marker_body(state: RunState, curator_file: &str) -> String {
    match state {
        RunState::ReadyForCurator => format!(
            "All artifacts generated. Edit {} (set `Approved: yes` or `Approved: no`) and \
             resume this run.\n",
            curator_file
        ),
        RunState::StoppedQcFail => {
            "Quality review did not pass. The curator step was skipped.\n".to_string()
        }
        RunState::CuratorVetoed => format!(
            "{} did not approve this run. No distribution output was produced.\n",
            curator_file
        ),
        RunState::PostBundleReady => "Post bundle written to post_bundle/.\n".to_string(),
        RunState::Draft | RunState::Rendering | RunState::Qc | RunState::Approved => String::new(),
    }
}

/// Write the marker for `state` and remove markers left by earlier halts
///
/// States without a marker leave the directory untouched.
pub fn write_marker(
    layout: &RunLayout,
    state: RunState,
    curator_file: &str,
) -> Result<(), StorageError> {
    let Some(path) = layout.marker_path(state) else {
        return Ok(());
    };

    for other in MARKER_STATES.iter().filter(|other| **other != state) {
        if let Some(stale) = layout.marker_path(*other) {
            if stale.exists() {
                fs::remove_file(&stale).map_err(|e| StorageError::write(&stale, e))?;
            }
        }
    }

    let content = format!("# {}\n\n{}", state.as_str(), marker_body(state, curator_file));
    layout::write_text(&path, &content)
}
