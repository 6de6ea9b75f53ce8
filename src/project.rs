//! A loaded project: configuration, contracts and the resolved provider, with every
//! configured path resolved against the directory holding the config file.

use crate::config::{ConfigLoader, ProjectConfig};
use crate::contract::ContractSet;
use crate::error::ConfigError;
use crate::provider::ProviderConfig;
use crate::stage::ArtifactKey;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the curator decision template inside the templates directory
pub const CURATOR_TEMPLATE_FILE: &str = "curator_decision.template.md";

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config_path: PathBuf,
    pub config: ProjectConfig,
    pub contracts: ContractSet,
    pub provider: ProviderConfig,
}

impl Project {
    /// Load the config at `config_path` and the contracts it points to
    pub fn load(config_path: &Path, model_override: Option<&str>) -> Result<Self, ConfigError> {
        let config = ConfigLoader::load_from_file(config_path)?;
        let root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let contracts_path = resolve_against(&root, &config.paths.contracts_file);
        let contracts = ContractSet::load(&contracts_path)?;
        let provider = ProviderConfig::resolve(&config.provider, model_override);

        debug!(
            config = %config_path.display(),
            contracts = %contracts_path.display(),
            provider = %provider.name,
            model = %provider.model,
            "Project loaded"
        );

        Ok(Self {
            root,
            config_path: config_path.to_path_buf(),
            config,
            contracts,
            provider,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_against(&self.root, path)
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.agents_dir)
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.runs_dir)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.templates_dir)
    }

    pub fn contracts_path(&self) -> PathBuf {
        self.resolve(&self.config.paths.contracts_file)
    }

    pub fn curator_template_path(&self) -> PathBuf {
        self.templates_dir().join(CURATOR_TEMPLATE_FILE)
    }

    pub fn prompt_path(&self, agent: &str) -> PathBuf {
        self.agents_dir().join(self.config.prompt_file(agent))
    }

    pub fn artifact_file(&self, key: ArtifactKey) -> String {
        self.config.artifact_file(key)
    }

    pub fn taste_profile_path(&self) -> Option<PathBuf> {
        self.config
            .policy
            .taste_profile
            .as_deref()
            .map(|path| self.resolve(path))
    }

    pub fn character_bible_path(&self) -> Option<PathBuf> {
        self.config
            .policy
            .character_bible
            .as_deref()
            .map(|path| self.resolve(path))
    }
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
