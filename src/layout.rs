//! Run identity and on-disk layout of a run directory.
//!
//! A full run lives at `<runs_dir>/<YYYY-MM>/<YYYY-MM-DD>_<slug>/`. Artifacts sit directly in
//! it, multi-file output goes in nested bundle directories, and the manifest and marker
//! files live alongside.

use crate::error::{ConfigError, StorageError};
use crate::manifest::{RunState, MANIFEST_FILE_NAME};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of the rendering prompt bundle, relative to the run directory
pub const RENDER_BUNDLE_DIR: &str = "render_prompts/v1";

/// Directory of the distribution output, relative to the run directory
pub const POST_BUNDLE_DIR: &str = "post_bundle";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-legible run identity: `<date>_<slug>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId {
    date: NaiveDate,
    slug: String,
}

impl RunId {
    /// Build a run id; the date defaults to today and the slug to `run`
    pub fn new(date: Option<&str>, slug: Option<&str>) -> Result<Self, ConfigError> {
        let date = match date {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
                ConfigError::InvalidRunIdentity(format!(
                    "date '{}' is not YYYY-MM-DD: {}",
                    raw, e
                ))
            })?,
            None => Local::now().date_naive(),
        };

        let slug = slug.unwrap_or("run").trim();
        if slug.is_empty() {
            return Err(ConfigError::InvalidRunIdentity(
                "slug cannot be empty".to_string(),
            ));
        }
        if slug.contains('/') || slug.contains('\\') || slug == "." || slug == ".." {
            return Err(ConfigError::InvalidRunIdentity(format!(
                "slug '{}' must not contain path separators",
                slug
            )));
        }

        Ok(Self {
            date,
            slug: slug.to_string(),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// `YYYY-MM` bucket directory name
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date.format(DATE_FORMAT), self.slug)
    }
}

/// Paths inside one run directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    run_dir: PathBuf,
}

impl RunLayout {
    /// Layout for a new run under `runs_dir`
    pub fn for_run(runs_dir: &Path, run_id: &RunId) -> Self {
        Self {
            run_dir: runs_dir.join(run_id.month()).join(run_id.to_string()),
        }
    }

    /// Layout for an existing run directory
    pub fn at(run_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_dir: run_dir.into(),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Run id recovered from the directory name
    pub fn run_id(&self) -> String {
        self.run_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.run_dir.display().to_string())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.run_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.run_dir.join(file_name)
    }

    pub fn render_bundle_dir(&self) -> PathBuf {
        self.run_dir.join(RENDER_BUNDLE_DIR)
    }

    pub fn post_bundle_dir(&self) -> PathBuf {
        self.run_dir.join(POST_BUNDLE_DIR)
    }

    /// Marker file for a halting state
    pub fn marker_path(&self, state: RunState) -> Option<PathBuf> {
        state.marker_file_name().map(|name| self.run_dir.join(name))
    }

    /// `<artifact file>.violation.md` next to the artifact
    pub fn violation_report_path(artifact_path: &Path) -> PathBuf {
        let mut name = artifact_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".violation.md");
        artifact_path.with_file_name(name)
    }

    /// Path relative to the run directory, as recorded in the manifest
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.run_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.run_dir).map_err(|e| StorageError::write(&self.run_dir, e))
    }
}

/// Write UTF-8 text, creating parent directories
pub fn write_text(path: &Path, content: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::write(parent, e))?;
    }
    fs::write(path, content).map_err(|e| StorageError::write(path, e))
}

pub fn read_text(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(|e| StorageError::read(path, e))
}

/// Copy `source` to `destination` unless the destination already exists
///
/// Returns `true` when a copy happened.
pub fn copy_if_absent(source: &Path, destination: &Path) -> Result<bool, StorageError> {
    if destination.exists() {
        return Ok(false);
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::write(parent, e))?;
    }
    fs::copy(source, destination).map_err(|e| StorageError::write(destination, e))?;
    Ok(true)
}

/// Remove a file or directory tree if present
///
/// Returns `true` when something was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool, StorageError> {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else if path.exists() {
        fs::remove_file(path)
    } else {
        return Ok(false);
    };
    removed.map_err(|e| StorageError::write(path, e))?;
    Ok(true)
}
