//! CLI output: error mapping from pipeline errors to stable CLI surface.

use crate::error::PipelineError;

/// Map pipeline errors to a string for CLI output.
/// Adds a next step where the user can act on the error.
pub fn map_error(e: &PipelineError) -> String {
    match e {
        PipelineError::MissingInput { artifact, .. } if artifact == "curator_decision" => format!(
            "{}\nFill in the curator decision file, then run 'reelflow resume' again.",
            e
        ),
        PipelineError::ContractViolation { .. } => {
            format!("{}\nThe run stopped; inspect the report and rerun.", e)
        }
        PipelineError::Config(_) => format!(
            "{}\nRun 'reelflow init' to scaffold a starter project.",
            e
        ),
        _ => e.to_string(),
    }
}
