//! Error types for reelflow runs.
//!
//! Gate outcomes (QC FAIL, curator VETO/UNKNOWN) are not errors; they come back as a
//! [`RunOutcome`](crate::orchestrator::RunOutcome). Everything here aborts the current invocation.

use crate::manifest::RunState;
use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error for {path}: {message}")]
    Serialization { path: PathBuf, message: String },
}

impl StorageError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

/// Configuration and contract-definition errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing contracts file: {0}")]
    ContractsNotFound(PathBuf),

    #[error("Invalid contracts file {path}: {message}")]
    InvalidContracts { path: PathBuf, message: String },

    #[error("Invalid run identity: {0}")]
    InvalidRunIdentity(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Generation provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Generation failed for agent '{agent}': {message}")]
    GenerationFailed { agent: String, message: String },
}

/// Top-level error for a run invocation
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Stage '{stage}' is missing required input '{artifact}' at {path}")]
    MissingInput {
        stage: String,
        artifact: String,
        path: PathBuf,
    },

    #[error("Missing agent prompt file for '{agent}': {path}")]
    MissingPrompt { agent: String, path: PathBuf },

    #[error("Contract violation in '{artifact}' produced by stage '{stage}': {message} (report: {report})")]
    ContractViolation {
        stage: String,
        artifact: String,
        message: String,
        report: PathBuf,
    },

    #[error("Artifact '{artifact}' failed validation: {message}")]
    ArtifactInvalid { artifact: String, message: String },

    #[error("No run manifest at {0}")]
    ManifestNotFound(PathBuf),

    #[error("Run in state {state} cannot be resumed; a curator decision is only consumed after QC passes")]
    InvalidResumeState { state: RunState },
}
