//! Configuration System
//!
//! Project configuration for reelflow runs. Layered with the `config` crate: built-in
//! defaults, then the project file, then `REELFLOW_*` environment overrides. Paths are kept
//! as written here; [`crate::project::Project`] resolves them against the config directory.

use crate::logging::LoggingConfig;
use crate::stage::{ArtifactKey, Stage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

mod loader;
mod merge;
mod sources;

pub use loader::ConfigLoader;

/// Default project config file name
pub const DEFAULT_CONFIG_FILE: &str = "project.yaml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    /// Artifact key to file name overrides, relative to the run directory
    #[serde(default)]
    pub artifacts: BTreeMap<String, String>,

    /// Agent to prompt file routing
    #[serde(default)]
    pub agent_routing: BTreeMap<String, AgentRoute>,

    #[serde(default)]
    pub run_defaults: RunDefaults,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub provider: ProviderSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Directory layout of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_agents_dir")]
    pub agents_dir: PathBuf,
    #[serde(default = "default_runs_dir")]
    pub runs_dir: PathBuf,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_contracts_file")]
    pub contracts_file: PathBuf,
}

pub(crate) fn default_agents_dir() -> PathBuf {
    PathBuf::from("agents")
}

pub(crate) fn default_runs_dir() -> PathBuf {
    PathBuf::from("runs")
}

pub(crate) fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

pub(crate) fn default_contracts_file() -> PathBuf {
    PathBuf::from("contracts/artifact_contracts.yaml")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            agents_dir: default_agents_dir(),
            runs_dir: default_runs_dir(),
            templates_dir: default_templates_dir(),
            contracts_file: default_contracts_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRoute {
    pub prompt_file: String,
}

/// Parameters fed into stage payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunDefaults {
    #[serde(default = "default_batch_size_ideas")]
    pub batch_size_ideas: u32,
    #[serde(default = "default_target_seconds")]
    pub target_seconds: u32,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_batch_size_ideas() -> u32 {
    10
}

fn default_target_seconds() -> u32 {
    30
}

fn default_aspect_ratio() -> String {
    "9:16".to_string()
}

fn default_resolution() -> String {
    "1080x1920".to_string()
}

fn default_window() -> String {
    "last 72 hours".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            batch_size_ideas: default_batch_size_ideas(),
            target_seconds: default_target_seconds(),
            aspect_ratio: default_aspect_ratio(),
            resolution: default_resolution(),
            window: default_window(),
            region: default_region(),
        }
    }
}

/// Run policy and the policy documents embedded in payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub stop_on_qc_fail: bool,
    #[serde(default)]
    pub taste_profile: Option<PathBuf>,
    #[serde(default)]
    pub character_bible: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            stop_on_qc_fail: true,
            taste_profile: None,
            character_bible: None,
        }
    }
}

/// Provider section as written in the project file
///
/// Only the listed parameters are carried into the resolved provider config; anything else
/// under `provider` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub max_output_tokens: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Initial delay between retries, doubled after each failed attempt
    #[serde(default)]
    pub retry_backoff_ms: Option<u64>,
    /// Quality status the stub provider reports (`PASS` or `FAIL`)
    #[serde(default)]
    pub stub_qc_status: Option<String>,
}

pub(crate) fn default_provider_name() -> String {
    "stub".to_string()
}

pub(crate) fn default_model() -> String {
    "stub-model".to_string()
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            model: default_model(),
            api_key_env: None,
            base_url: None,
            temperature: None,
            top_p: None,
            max_output_tokens: None,
            seed: None,
            timeout_seconds: None,
            max_retries: None,
            retry_backoff_ms: None,
            stub_qc_status: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Paths(String),
    Artifact(String, String),
    Agent(String, String),
    Provider(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Paths(msg) => write!(f, "Paths: {}", msg),
            ValidationError::Artifact(key, msg) => write!(f, "Artifact '{}': {}", key, msg),
            ValidationError::Agent(name, msg) => write!(f, "Agent '{}': {}", name, msg),
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ProjectConfig {
    /// File name of an artifact relative to the run directory
    pub fn artifact_file(&self, key: ArtifactKey) -> String {
        self.artifacts
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| key.default_file_name().to_string())
    }

    /// Prompt file of an agent relative to the agents directory
    pub fn prompt_file(&self, agent: &str) -> String {
        self.agent_routing
            .get(agent)
            .map(|route| route.prompt_file.clone())
            .unwrap_or_else(|| format!("{}.md", agent))
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.paths.runs_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Paths("runs_dir cannot be empty".to_string()));
        }
        if self.paths.agents_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Paths(
                "agents_dir cannot be empty".to_string(),
            ));
        }
        if self.paths.contracts_file.as_os_str().is_empty() {
            errors.push(ValidationError::Paths(
                "contracts_file cannot be empty".to_string(),
            ));
        }

        for (key, file) in &self.artifacts {
            if key.parse::<ArtifactKey>().is_err() {
                errors.push(ValidationError::Artifact(
                    key.clone(),
                    "unknown artifact key".to_string(),
                ));
            }
            if file.trim().is_empty() {
                errors.push(ValidationError::Artifact(
                    key.clone(),
                    "file name cannot be empty".to_string(),
                ));
            } else if PathBuf::from(file).is_absolute() || file.split('/').any(|part| part == "..")
            {
                errors.push(ValidationError::Artifact(
                    key.clone(),
                    "file name must stay inside the run directory".to_string(),
                ));
            }
        }

        for (agent, route) in &self.agent_routing {
            if !Stage::ALL.iter().any(|stage| stage.agent() == agent) {
                errors.push(ValidationError::Agent(
                    agent.clone(),
                    "no stage uses this agent".to_string(),
                ));
            }
            if route.prompt_file.trim().is_empty() {
                errors.push(ValidationError::Agent(
                    agent.clone(),
                    "prompt_file cannot be empty".to_string(),
                ));
            }
        }

        if self.provider.name.trim().is_empty() {
            errors.push(ValidationError::Provider("name cannot be empty".to_string()));
        }
        if self.provider.model.trim().is_empty() {
            errors.push(ValidationError::Provider("model cannot be empty".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
