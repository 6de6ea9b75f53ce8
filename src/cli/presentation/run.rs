//! Run, resume and validate presentation.

use crate::contract::ValidationOutcome;
use crate::manifest::RunState;
use crate::orchestrator::RunOutcome;
use owo_colors::OwoColorize;
use std::path::Path;

fn styled_state(state: RunState) -> String {
    match state {
        RunState::ReadyForCurator | RunState::PostBundleReady => {
            format!("{}", state.as_str().green().bold())
        }
        RunState::StoppedQcFail | RunState::CuratorVetoed => {
            format!("{}", state.as_str().yellow().bold())
        }
        other => format!("{}", other.as_str().bold()),
    }
}

fn next_step(outcome: &RunOutcome) -> Option<String> {
    match outcome.state {
        RunState::ReadyForCurator => Some(format!(
            "Fill in the curator decision in {}, then run: reelflow resume {}",
            outcome.run_dir.display(),
            outcome.run_dir.display()
        )),
        RunState::StoppedQcFail => {
            Some("Quality review did not pass; see qc_report.md in the run directory.".to_string())
        }
        RunState::CuratorVetoed => Some(
            "Curator did not approve. Edit the decision and resume again to distribute."
                .to_string(),
        ),
        RunState::PostBundleReady => Some(format!(
            "Post bundle written under {}",
            outcome.run_dir.join(crate::layout::POST_BUNDLE_DIR).display()
        )),
        _ => None,
    }
}

pub fn format_run_outcome(outcome: &RunOutcome) -> String {
    let mut output = format!(
        "Run {} is {}\n",
        outcome.run_id.bold(),
        styled_state(outcome.state)
    );
    output.push_str(&format!("Run directory: {}\n", outcome.run_dir.display()));

    if outcome.stages_executed.is_empty() {
        output.push_str("Stages executed: none\n");
    } else {
        output.push_str("Stages executed:\n");
        for stage in &outcome.stages_executed {
            output.push_str(&format!("  ✓ {} ({})\n", stage, stage.agent()));
        }
    }

    if let Some(hint) = next_step(outcome) {
        output.push('\n');
        output.push_str(&hint);
    }
    output
}

pub fn format_validation_outcome(
    artifact_key: &str,
    file: &Path,
    outcome: &ValidationOutcome,
) -> String {
    format!(
        "{} {} ({}): {}",
        "✓".green(),
        file.display(),
        artifact_key,
        outcome.message
    )
}
