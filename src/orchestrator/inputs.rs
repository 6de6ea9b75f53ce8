//! Input fingerprinting and policy document loading.

use crate::error::PipelineError;
use crate::hasher;
use crate::layout;
use crate::manifest::{FileFingerprint, InputFingerprints, PolicyInputs, ProviderInputs};
use crate::project::Project;
use crate::stage::{LoadedDocument, Stage};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Policy documents embedded into stage payloads
#[derive(Debug, Clone)]
pub struct PolicyDocuments {
    pub taste_profile: LoadedDocument,
    pub character_bible: LoadedDocument,
}

fn fingerprint(path: &Path) -> Result<FileFingerprint, PipelineError> {
    Ok(FileFingerprint {
        path: path.display().to_string(),
        digest: hasher::digest_file(path)?,
    })
}

fn optional_fingerprint(path: Option<PathBuf>) -> Result<Option<FileFingerprint>, PipelineError> {
    match path {
        Some(path) if path.is_file() => fingerprint(&path).map(Some),
        _ => Ok(None),
    }
}

/// Fingerprint the config, the contracts, every present agent prompt and policy document
///
/// Missing prompts are not an error here; the stage that needs one fails when it runs.
pub fn fingerprint_inputs(project: &Project) -> Result<InputFingerprints, PipelineError> {
    let mut inputs = InputFingerprints {
        config: Some(fingerprint(project.config_path())?),
        contracts: Some(fingerprint(&project.contracts_path())?),
        ..InputFingerprints::default()
    };

    for stage in Stage::ALL {
        let prompt_path = project.prompt_path(stage.agent());
        if prompt_path.is_file() {
            inputs
                .prompts
                .insert(stage.agent().to_string(), fingerprint(&prompt_path)?);
        }
    }

    inputs.policy = PolicyInputs {
        taste_profile: optional_fingerprint(project.taste_profile_path())?,
        character_bible: optional_fingerprint(project.character_bible_path())?,
        stop_on_qc_fail: project.config.policy.stop_on_qc_fail,
    };

    inputs.provider = Some(ProviderInputs {
        name: project.provider.name.clone(),
        model: project.provider.model.clone(),
        params: project.provider.params.clone(),
    });

    Ok(inputs)
}

fn load_policy_document(
    label: &str,
    path: Option<PathBuf>,
) -> Result<LoadedDocument, PipelineError> {
    let default_name = format!("{}.md", label);
    let Some(path) = path else {
        return Ok(LoadedDocument::new(
            &default_name,
            format!("# {}\n\n(not configured)\n", default_name),
        ));
    };

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(default_name);

    if !path.is_file() {
        warn!(
            policy = label,
            path = %path.display(),
            "Policy document missing, using placeholder"
        );
        return Ok(LoadedDocument::new(
            &name,
            format!("# {}\n\n(fill in)\n", name),
        ));
    }

    Ok(LoadedDocument::new(name, layout::read_text(&path)?))
}

pub fn load_policy_documents(project: &Project) -> Result<PolicyDocuments, PipelineError> {
    Ok(PolicyDocuments {
        taste_profile: load_policy_document("taste_profile", project.taste_profile_path())?,
        character_bible: load_policy_document("character_bible", project.character_bible_path())?,
    })
}
