//! Executes one stage: inputs, payload, generation, validation, recording.

use super::context::RunContext;
use super::inputs::PolicyDocuments;
use crate::config::RunDefaults;
use crate::contract::ValidationOutcome;
use crate::error::PipelineError;
use crate::hasher;
use crate::layout::{self, RunLayout, RENDER_BUNDLE_DIR};
use crate::manifest::{timestamp_now, EventKind};
use crate::project::Project;
use crate::provider::{GenerationProvider, GenerationRequest};
use crate::stage::{ArtifactKey, LoadedDocument, PayloadContext, Stage};
use serde_json::json;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// Output key under which the rendering prompt bundle is recorded
pub const RENDER_BUNDLE_OUTPUT: &str = "render_bundle";

pub struct StageRunner<'a, P: ?Sized> {
    pub project: &'a Project,
    pub provider: &'a P,
    pub policy: &'a PolicyDocuments,
}

impl<'a, P: GenerationProvider + ?Sized> StageRunner<'a, P> {
    /// Run `stage` against the run in `ctx`
    ///
    /// On success the artifact is written, its digest recorded and the manifest persisted.
    /// Any failure is recorded as an event before the error is returned.
    pub fn run(&self, ctx: &mut RunContext, stage: Stage) -> Result<(), PipelineError> {
        if let Some(state) = stage.entry_state() {
            ctx.transition(state, &format!("entering {}", stage))?;
        }

        info!(run_id = %ctx.run_id(), stage = %stage, agent = stage.agent(), "Stage started");
        ctx.record_event(
            EventKind::StageStarted,
            json!({ "stage": stage.as_str(), "agent": stage.agent() }),
        )?;

        match self.execute(ctx, stage) {
            Ok(()) => {
                ctx.mark_executed(stage);
                info!(run_id = %ctx.run_id(), stage = %stage, "Stage completed");
                Ok(())
            }
            Err(err) => {
                if !matches!(err, PipelineError::ContractViolation { .. }) {
                    error!(run_id = %ctx.run_id(), stage = %stage, error = %err, "Stage failed");
                    ctx.record_event(
                        EventKind::StageFailed,
                        json!({ "stage": stage.as_str(), "error": err.to_string() }),
                    )?;
                }
                Err(err)
            }
        }
    }

    fn execute(&self, ctx: &mut RunContext, stage: Stage) -> Result<(), PipelineError> {
        let inputs = self.load_inputs(&ctx.layout, stage)?;
        let system_prompt = self.load_prompt(stage)?;

        let payload = stage.build_payload(&PayloadContext {
            defaults: &self.project.config.run_defaults,
            inputs: &inputs,
            taste_profile: &self.policy.taste_profile,
            character_bible: &self.policy.character_bible,
        });

        let started = Instant::now();
        let response = self.provider.generate(
            &GenerationRequest {
                agent: stage.agent(),
                system_prompt: &system_prompt,
                user_payload: &payload,
            },
            &self.project.provider,
        )?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let key = stage.artifact();
        let file_name = self.project.artifact_file(key);
        let artifact_path = ctx.layout.artifact_path(&file_name);
        let digest = hasher::digest_text(&response.text);
        let bytes = response.text.len() as u64;

        ctx.record_event(
            EventKind::Generation,
            json!({
                "stage": stage.as_str(),
                "agent": stage.agent(),
                "provider": response.provider_name,
                "model": response.model,
                "request_id": response.request_id,
                "usage": response.usage,
                "latency_ms": latency_ms,
                "output_digest": digest,
                "output_bytes": bytes,
            }),
        )?;

        layout::write_text(&artifact_path, &response.text)?;

        let outcome = self.project.contracts.validate(key.as_str(), &response.text);
        if !outcome.ok {
            return Err(self.report_violation(ctx, stage, &artifact_path, &outcome));
        }

        ctx.manifest.record_output(
            key.as_str(),
            ctx.layout.relative(&artifact_path),
            digest.clone(),
            bytes,
        );

        if stage == Stage::Rendering {
            write_render_bundle(ctx, &self.project.config.run_defaults, &digest)?;
        }

        ctx.record_event(
            EventKind::StageCompleted,
            json!({
                "stage": stage.as_str(),
                "artifact": key.as_str(),
                "path": ctx.layout.relative(&artifact_path),
                "digest": digest,
                "bytes": bytes,
            }),
        )?;
        Ok(())
    }

    fn load_inputs(
        &self,
        run_layout: &RunLayout,
        stage: Stage,
    ) -> Result<Vec<(ArtifactKey, LoadedDocument)>, PipelineError> {
        stage
            .inputs()
            .iter()
            .map(|key| {
                let file_name = self.project.artifact_file(*key);
                let path = run_layout.artifact_path(&file_name);
                if !path.is_file() {
                    return Err(PipelineError::MissingInput {
                        stage: stage.as_str().to_string(),
                        artifact: key.as_str().to_string(),
                        path,
                    });
                }
                let text = layout::read_text(&path)?;
                Ok((*key, LoadedDocument::new(file_name, text)))
            })
            .collect()
    }

    fn load_prompt(&self, stage: Stage) -> Result<String, PipelineError> {
        let path = self.project.prompt_path(stage.agent());
        if !path.is_file() {
            return Err(PipelineError::MissingPrompt {
                agent: stage.agent().to_string(),
                path,
            });
        }
        Ok(layout::read_text(&path)?)
    }

    /// Write the sibling violation report, record the event and build the error
    fn report_violation(
        &self,
        ctx: &mut RunContext,
        stage: Stage,
        artifact_path: &Path,
        outcome: &ValidationOutcome,
    ) -> PipelineError {
        let key = stage.artifact();
        let report_path = RunLayout::violation_report_path(artifact_path);
        let rule = outcome
            .rule
            .as_ref()
            .map(|rule| rule.to_string())
            .unwrap_or_default();
        let report = format!(
            "# Contract Violation\n\n\
             - Artifact: {}\n\
             - Stage: {}\n\
             - File: {}\n\
             - Rule: {}\n\
             - Message: {}\n\
             - Detected at: {}\n",
            key.as_str(),
            stage.as_str(),
            ctx.layout.relative(artifact_path),
            rule,
            outcome.message,
            timestamp_now(),
        );

        error!(
            run_id = %ctx.run_id(),
            stage = %stage,
            artifact = key.as_str(),
            message = %outcome.message,
            "Contract violation"
        );

        if let Err(err) = layout::write_text(&report_path, &report) {
            return err.into();
        }
        if let Err(err) = ctx.record_event(
            EventKind::ContractViolation,
            json!({
                "stage": stage.as_str(),
                "artifact": key.as_str(),
                "rule": rule,
                "message": outcome.message,
                "report": ctx.layout.relative(&report_path),
            }),
        ) {
            return err.into();
        }

        PipelineError::ContractViolation {
            stage: stage.as_str().to_string(),
            artifact: key.as_str().to_string(),
            message: outcome.message.clone(),
            report: report_path,
        }
    }
}

/// Write the rendering prompt bundle and record it as one output
fn write_render_bundle(
    ctx: &mut RunContext,
    defaults: &RunDefaults,
    report_digest: &str,
) -> Result<(), PipelineError> {
    let bundle_dir = ctx.layout.render_bundle_dir();
    let files = [
        (
            "shot_01.txt",
            format!(
                "Shot 01\nAspect ratio: {}\nResolution: {}\nTarget seconds: {}\nRender report: {}\n",
                defaults.aspect_ratio, defaults.resolution, defaults.target_seconds, report_digest
            ),
        ),
        (
            "voice.txt",
            format!(
                "Voice-over for {}\nPacing: {} seconds total\n",
                ctx.run_id(),
                defaults.target_seconds
            ),
        ),
        (
            "edit_notes.md",
            "# Edit Notes\n\n- Assemble shots in scene plan order.\n- Lay voice.txt under shot 01.\n"
                .to_string(),
        ),
    ];

    let mut members = Vec::with_capacity(files.len());
    let mut total_bytes = 0u64;
    for (name, content) in &files {
        layout::write_text(&bundle_dir.join(name), content)?;
        members.push((name.to_string(), hasher::digest_text(content)));
        total_bytes += content.len() as u64;
    }

    ctx.manifest.record_output(
        RENDER_BUNDLE_OUTPUT,
        RENDER_BUNDLE_DIR,
        hasher::digest_members(&members),
        total_bytes,
    );
    Ok(())
}
