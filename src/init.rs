//! Project scaffolding for `reelflow init`
//!
//! The starter config, contracts, curator template, agent prompts and policy documents are
//! embedded in the binary at build time and written into a project directory at runtime.

use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::ConfigError;
use crate::project::Project;
use std::path::Path;

/// Default project files embedded in binary at compile time, keyed by relative path
pub const DEFAULT_FILES: &[(&str, &str)] = &[
    (
        DEFAULT_CONFIG_FILE,
        include_str!("../defaults/project.yaml"),
    ),
    (
        "contracts/artifact_contracts.yaml",
        include_str!("../defaults/artifact_contracts.yaml"),
    ),
    (
        "templates/curator_decision.template.md",
        include_str!("../defaults/curator_decision.template.md"),
    ),
    (
        "agents/trend_scout.md",
        include_str!("../defaults/agents/trend_scout.md"),
    ),
    ("agents/theo.md", include_str!("../defaults/agents/theo.md")),
    ("agents/mabel.md", include_str!("../defaults/agents/mabel.md")),
    ("agents/lena.md", include_str!("../defaults/agents/lena.md")),
    ("agents/rowan.md", include_str!("../defaults/agents/rowan.md")),
    ("agents/evan.md", include_str!("../defaults/agents/evan.md")),
    ("agents/qc.md", include_str!("../defaults/agents/qc.md")),
    (
        "agents/parker.md",
        include_str!("../defaults/agents/parker.md"),
    ),
    (
        "policy/taste_profile.md",
        include_str!("../defaults/policy/taste_profile.md"),
    ),
    (
        "policy/character_bible.md",
        include_str!("../defaults/policy/character_bible.md"),
    ),
];

/// Result of initialization operation
#[derive(Debug, Clone, Default)]
pub struct InitResult {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

/// Summary of initialization operations
#[derive(Debug, Clone)]
pub struct InitSummary {
    pub files: InitResult,
    /// `None` when the written project loads cleanly
    pub validation_error: Option<String>,
}

/// Write every default file under `root`; existing files are kept unless `force` is set
pub fn initialize_files(root: &Path, force: bool) -> InitResult {
    let mut result = InitResult::default();

    for (relative, content) in DEFAULT_FILES {
        let path = root.join(relative);

        if path.exists() && !force {
            result.skipped.push(relative.to_string());
            continue;
        }

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                result.errors.push(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ));
                continue;
            }
        }

        match std::fs::write(&path, content) {
            Ok(_) => result.created.push(relative.to_string()),
            Err(e) => result.errors.push(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )),
        }
    }

    result
}

/// Scaffold a project under `root` and check that it loads
pub fn initialize_project(root: &Path, force: bool) -> InitSummary {
    let files = initialize_files(root, force);
    let validation_error = validate_initialization(root).err().map(|e| e.to_string());
    InitSummary {
        files,
        validation_error,
    }
}

/// Files that `initialize_project` would create under `root`
pub fn list_initialization(root: &Path) -> Vec<String> {
    DEFAULT_FILES
        .iter()
        .filter(|(relative, _)| !root.join(relative).exists())
        .map(|(relative, _)| relative.to_string())
        .collect()
}

/// Load the project under `root` the same way a run would
pub fn validate_initialization(root: &Path) -> Result<(), ConfigError> {
    Project::load(&root.join(DEFAULT_CONFIG_FILE), None).map(|_| ())
}
