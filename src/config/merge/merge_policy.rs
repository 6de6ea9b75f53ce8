//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win: defaults, then the project file, then environment overrides.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("paths.agents_dir", "agents")?
        .set_default("paths.runs_dir", "runs")?
        .set_default("paths.templates_dir", "templates")?
        .set_default("paths.contracts_file", "contracts/artifact_contracts.yaml")?
        .set_default("policy.stop_on_qc_fail", true)?
        .set_default("provider.name", "stub")?
        .set_default("provider.model", "stub-model")
}
