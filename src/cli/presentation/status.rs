//! Status presentation: manifest summary as styled text tables or json.

use crate::error::{PipelineError, StorageError};
use crate::manifest::{RunManifest, MANIFEST_FILE_NAME};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format a run manifest as human-readable text using comfy-table and styled headings.
pub fn format_status_text(manifest: &RunManifest) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Run Status")));
    out.push_str(&format!("Run:      {}\n", manifest.run.id));
    out.push_str(&format!("State:    {}\n", manifest.state().as_str().bold()));
    out.push_str(&format!("Mode:     {}\n", manifest.run.mode.as_str()));
    out.push_str(&format!("Created:  {}\n", manifest.run.created_at));
    out.push_str(&format!("Updated:  {}\n", manifest.run.updated_at));
    out.push_str(&format!("Events:   {}\n\n", manifest.events.len()));

    out.push_str(&format!("{}\n", format_section_heading("State history")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["State", "At", "Reason"]);
    for entry in &manifest.run.state_history {
        table.add_row(vec![
            entry.state.as_str().to_string(),
            entry.at.clone(),
            entry.reason.clone(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n", format_section_heading("Outputs")));
    if manifest.outputs.is_empty() {
        out.push_str("No outputs recorded.\n\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Artifact", "Path", "Digest", "Bytes"]);
        for (key, record) in &manifest.outputs {
            table.add_row(vec![
                key.clone(),
                record.path.clone(),
                record.digest.chars().take(12).collect::<String>(),
                record.bytes.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format!("{}\n", format_section_heading("Gates")));
    if manifest.gates.is_empty() {
        out.push_str("No gate decisions recorded.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Gate", "Decision", "Source", "At"]);
        for (gate, record) in &manifest.gates {
            table.add_row(vec![
                gate.clone(),
                record.decision.as_str().to_string(),
                record.source.clone(),
                record.at.clone(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

/// Format a run manifest summary as pretty json.
pub fn format_status_json(manifest: &RunManifest) -> Result<String, PipelineError> {
    let value = json!({
        "run_id": manifest.run.id,
        "state": manifest.state().as_str(),
        "mode": manifest.run.mode.as_str(),
        "created_at": manifest.run.created_at,
        "updated_at": manifest.run.updated_at,
        "state_history": manifest.run.state_history,
        "outputs": manifest.outputs,
        "gates": manifest.gates,
        "event_count": manifest.events.len(),
    });
    serde_json::to_string_pretty(&value).map_err(|e| {
        StorageError::Serialization {
            path: PathBuf::from(MANIFEST_FILE_NAME),
            message: e.to_string(),
        }
        .into()
    })
}
