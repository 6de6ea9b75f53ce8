//! Artifact contracts: declarative rules a produced artifact must satisfy.
//!
//! A contract file has a top-level `artifacts` mapping from artifact key to optional
//! `required_headings`, `required_any` and `required_yaml_keys` lists. Validation is pure:
//! it reads the content and returns an outcome, nothing else.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Rules for one artifact key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactContract {
    /// Substrings that must all appear verbatim
    #[serde(default, deserialize_with = "null_as_empty")]
    pub required_headings: Vec<String>,

    /// Markers of which at least one must appear
    #[serde(default, deserialize_with = "null_as_empty")]
    pub required_any: Vec<String>,

    /// Dotted key paths that must resolve when the content is parsed as a mapping
    #[serde(default, deserialize_with = "null_as_empty")]
    pub required_yaml_keys: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The full set of contracts, keyed by artifact key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSet {
    pub artifacts: BTreeMap<String, Option<ArtifactContract>>,
}

/// The rule that rejected an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractRule {
    RequiredHeading(String),
    RequiredAny(Vec<String>),
    YamlParse,
    YamlRoot,
    YamlKey(String),
}

impl fmt::Display for ContractRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractRule::RequiredHeading(heading) => write!(f, "required_headings: {}", heading),
            ContractRule::RequiredAny(markers) => {
                write!(f, "required_any: [{}]", markers.join(", "))
            }
            ContractRule::YamlParse => write!(f, "required_yaml_keys: content must parse"),
            ContractRule::YamlRoot => write!(f, "required_yaml_keys: mapping at root"),
            ContractRule::YamlKey(path) => write!(f, "required_yaml_keys: {}", path),
        }
    }
}

/// Outcome of validating one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub ok: bool,
    pub message: String,
    pub rule: Option<ContractRule>,
}

impl ValidationOutcome {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            rule: None,
        }
    }

    fn fail(rule: ContractRule, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            rule: Some(rule),
        }
    }
}

impl ContractSet {
    /// Load contracts from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ContractsNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidContracts {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&raw).map_err(|message| ConfigError::InvalidContracts {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse contracts from YAML text
    pub fn from_yaml_str(raw: &str) -> Result<Self, String> {
        let root: Value = serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
        let Value::Mapping(map) = &root else {
            return Err("expected a mapping with top-level 'artifacts'".to_string());
        };
        if !map.contains_key("artifacts") {
            return Err("expected top-level 'artifacts'".to_string());
        }
        serde_yaml::from_value(root).map_err(|e| e.to_string())
    }

    pub fn get(&self, artifact_key: &str) -> Option<&ArtifactContract> {
        self.artifacts.get(artifact_key).and_then(Option::as_ref)
    }

    /// Validate content against the contract registered for `artifact_key`
    ///
    /// Checks run in a fixed order and stop at the first failure: required headings,
    /// alternative markers, then structured key paths.
    pub fn validate(&self, artifact_key: &str, content: &str) -> ValidationOutcome {
        let Some(contract) = self.get(artifact_key) else {
            return ValidationOutcome::pass(format!(
                "No contract for artifact '{}' (skipping).",
                artifact_key
            ));
        };

        for heading in &contract.required_headings {
            if !content.contains(heading.as_str()) {
                return ValidationOutcome::fail(
                    ContractRule::RequiredHeading(heading.clone()),
                    format!("Missing required heading: {}", heading),
                );
            }
        }

        if !contract.required_any.is_empty()
            && !contract
                .required_any
                .iter()
                .any(|marker| content.contains(marker.as_str()))
        {
            return ValidationOutcome::fail(
                ContractRule::RequiredAny(contract.required_any.clone()),
                format!(
                    "Missing required marker (any of): {}",
                    contract.required_any.join(", ")
                ),
            );
        }

        if !contract.required_yaml_keys.is_empty() {
            let parsed: Value = match serde_yaml::from_str(content) {
                Ok(value) => value,
                Err(e) => {
                    return ValidationOutcome::fail(
                        ContractRule::YamlParse,
                        format!("Invalid YAML: {}", e),
                    )
                }
            };
            if !parsed.is_mapping() {
                return ValidationOutcome::fail(
                    ContractRule::YamlRoot,
                    "Invalid YAML: expected mapping at root",
                );
            }
            for key_path in &contract.required_yaml_keys {
                if !has_key_path(&parsed, key_path) {
                    return ValidationOutcome::fail(
                        ContractRule::YamlKey(key_path.clone()),
                        format!("Missing required YAML key: {}", key_path),
                    );
                }
            }
        }

        ValidationOutcome::pass("OK")
    }
}

/// Descend one mapping key per dotted segment, e.g. `inputs.config.digest`
fn has_key_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for segment in key_path.split('.') {
        let Value::Mapping(map) = current else {
            return false;
        };
        match map.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}
