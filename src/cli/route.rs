//! CLI route: single route table and command context. Dispatches to the orchestrator,
//! the contract validator and project scaffolding, then hands results to presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_init_preview, format_init_summary, format_run_outcome, format_status_json,
    format_status_text, format_validation_outcome,
};
use crate::error::{ConfigError, PipelineError};
use crate::init;
use crate::layout::{self, RunId, RunLayout};
use crate::manifest::RunManifest;
use crate::orchestrator::Orchestrator;
use crate::project::Project;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: the project config path every command resolves from.
pub struct CommandContext {
    config_path: PathBuf,
}

impl CommandContext {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory holding the config file; `init` scaffolds here
    fn project_root(&self) -> PathBuf {
        match self.config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Execute a command and return its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, PipelineError> {
        let started = Instant::now();
        debug!(command = command.name(), config = %self.config_path.display(), "Routing command");

        let result = match command {
            Commands::Run { date, slug, model } => {
                let run_id = RunId::new(date.as_deref(), Some(slug.as_str()))?;
                let orchestrator =
                    Orchestrator::from_config_file(&self.config_path, model.as_deref())?;
                let outcome = orchestrator.run_full(&run_id)?;
                Ok(format_run_outcome(&outcome))
            }
            Commands::Resume { run_dir, model } => {
                let orchestrator =
                    Orchestrator::from_config_file(&self.config_path, model.as_deref())?;
                let outcome = orchestrator.resume(run_dir)?;
                Ok(format_run_outcome(&outcome))
            }
            Commands::Status { run_dir, format } => self.handle_status(run_dir, format),
            Commands::Validate { artifact_key, file } => self.handle_validate(artifact_key, file),
            Commands::Init { force, list } => self.handle_init(*force, *list),
        };

        info!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_status(&self, run_dir: &Path, format: &str) -> Result<String, PipelineError> {
        let manifest_path = RunLayout::at(run_dir).manifest_path();
        let manifest = RunManifest::load(&manifest_path)?
            .ok_or(PipelineError::ManifestNotFound(manifest_path))?;
        match format {
            "text" => Ok(format_status_text(&manifest)),
            "json" => format_status_json(&manifest),
            other => Err(ConfigError::Invalid(format!(
                "Unknown status format '{}' (expected text or json)",
                other
            ))
            .into()),
        }
    }

    fn handle_validate(&self, artifact_key: &str, file: &Path) -> Result<String, PipelineError> {
        let project = Project::load(&self.config_path, None)?;
        let content = layout::read_text(file)?;
        let outcome = project.contracts.validate(artifact_key, &content);
        if !outcome.ok {
            return Err(PipelineError::ArtifactInvalid {
                artifact: artifact_key.to_string(),
                message: outcome.message,
            });
        }
        Ok(format_validation_outcome(artifact_key, file, &outcome))
    }

    fn handle_init(&self, force: bool, list: bool) -> Result<String, PipelineError> {
        let root = self.project_root();
        if list {
            return Ok(format_init_preview(&root, &init::list_initialization(&root)));
        }
        let summary = init::initialize_project(&root, force);
        Ok(format_init_summary(&root, &summary, force))
    }
}
