//! Init command presentation: preview and summary formatters.

use crate::init::InitSummary;
use std::path::Path;

pub fn format_init_preview(root: &Path, pending: &[String]) -> String {
    let mut output = String::from("Initialization Preview:\n\n");

    if pending.is_empty() {
        output.push_str(&format!(
            "All default project files already exist in {}.\n",
            root.display()
        ));
        return output;
    }

    output.push_str(&format!("Would create in {}:\n", root.display()));
    for file in pending {
        output.push_str(&format!("  - {}\n", file));
    }
    output.push('\n');
    output.push_str("Run 'reelflow init' to perform initialization.\n");
    output
}

pub fn format_init_summary(root: &Path, summary: &InitSummary, force: bool) -> String {
    let mut output = format!("Initializing reelflow project in {}...\n\n", root.display());

    for file in &summary.files.created {
        if force {
            output.push_str(&format!("  ✓ {} (overwritten)\n", file));
        } else {
            output.push_str(&format!("  ✓ {}\n", file));
        }
    }
    for file in &summary.files.skipped {
        output.push_str(&format!("  ⊘ {} (already exists, skipped)\n", file));
    }
    for error in &summary.files.errors {
        output.push_str(&format!("  ✗ {}\n", error));
    }
    output.push('\n');

    match &summary.validation_error {
        None => output.push_str("Project configuration is valid.\n\nRun 'reelflow run' to start a run.\n"),
        Some(message) => output.push_str(&format!("Project configuration is invalid: {}\n", message)),
    }
    output
}
