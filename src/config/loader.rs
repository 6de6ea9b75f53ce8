//! Loads and validates a [`ProjectConfig`] from its layered sources.

use super::merge::merge_policy;
use super::sources::{environment, project_file};
use super::ProjectConfig;
use crate::error::ConfigError;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the project configuration from `config_path`
    ///
    /// Precedence (highest last): built-in defaults, the project file, `REELFLOW_*`
    /// environment variables. The result is validated before it is returned.
    pub fn load_from_file(config_path: &Path) -> Result<ProjectConfig, ConfigError> {
        if !config_path.is_file() {
            return Err(ConfigError::NotFound(config_path.to_path_buf()));
        }

        let builder = merge_policy::builder_with_defaults()?;
        let builder = project_file::add_to_builder(builder, config_path)?;
        let builder = environment::add_to_builder(builder)?;

        let config: ProjectConfig = builder.build()?.try_deserialize().map_err(|e| {
            ConfigError::Invalid(format!("{}: {}", config_path.display(), e))
        })?;

        config.validate().map_err(|errors| {
            ConfigError::Invalid(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        Ok(config)
    }
}
