//! Environment source: `REELFLOW_<SECTION>__<KEY>` overrides,
//! e.g. `REELFLOW_POLICY__STOP_ON_QC_FAIL=false`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "REELFLOW";

/// Add environment overrides to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    ))
}
