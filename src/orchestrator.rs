//! Stage Orchestrator
//!
//! Drives a run through the fixed stage sequence and the run state machine. A full run
//! executes every stage up to quality review and halts at the QC gate or in
//! `READY_FOR_CURATOR`. Resume consumes the curator decision and either stops in
//! `CURATOR_VETOED` or runs distribution and ends in `POST_BUNDLE_READY`.

mod context;
mod inputs;
mod markers;
mod stage_exec;

pub use context::{RunContext, RunOutcome};
pub use inputs::{fingerprint_inputs, load_policy_documents, PolicyDocuments};
pub use stage_exec::RENDER_BUNDLE_OUTPUT;

use crate::error::{PipelineError, StorageError};
use crate::gate::{self, CuratorDecision, Gate, GateDecision, QualityStatus};
use crate::layout::{self, RunId, RunLayout};
use crate::manifest::{EventKind, RunManifest, RunMode, RunState};
use crate::project::Project;
use crate::provider::{GenerationProvider, ProviderFactory};
use crate::stage::{ArtifactKey, Stage};
use serde_json::json;
use stage_exec::StageRunner;
use std::path::Path;
use tracing::{info, warn};

/// Built-in curator decision template, used when the project has none
pub const DEFAULT_CURATOR_TEMPLATE: &str = include_str!("../defaults/curator_decision.template.md");

pub struct Orchestrator<P: ?Sized = dyn GenerationProvider> {
    project: Project,
    provider: Box<P>,
}

impl Orchestrator {
    /// Build an orchestrator using the provider named in the project config
    pub fn from_project(project: Project) -> Result<Self, PipelineError> {
        let provider = ProviderFactory::create(&project.provider)?;
        Ok(Self { project, provider })
    }

    /// Load the project at `config_path` and build an orchestrator for it
    pub fn from_config_file(
        config_path: &Path,
        model_override: Option<&str>,
    ) -> Result<Self, PipelineError> {
        Self::from_project(Project::load(config_path, model_override)?)
    }
}

impl<P: GenerationProvider + ?Sized> Orchestrator<P> {
    pub fn new(project: Project, provider: Box<P>) -> Self {
        Self { project, provider }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Execute a full run up to the curator gate
    pub fn run_full(&self, run_id: &RunId) -> Result<RunOutcome, PipelineError> {
        let run_layout = RunLayout::for_run(&self.project.runs_dir(), run_id);
        run_layout.ensure_exists()?;

        let inputs = fingerprint_inputs(&self.project)?;
        let policy = load_policy_documents(&self.project)?;
        let run_id = run_id.to_string();

        let manifest = match self.load_prior_manifest(&run_layout) {
            Some(mut manifest) if manifest.run.id == run_id => {
                manifest.begin_invocation(RunMode::Full);
                manifest.inputs = inputs;
                self.supersede_curator_review(&run_layout, &mut manifest)?;
                manifest
            }
            Some(manifest) => {
                warn!(
                    run_id = %run_id,
                    found = %manifest.run.id,
                    "Existing manifest belongs to another run, starting fresh"
                );
                RunManifest::initialize(&run_id, RunMode::Full, inputs)
            }
            None => RunManifest::initialize(&run_id, RunMode::Full, inputs),
        };
        self.ensure_curator_template(&run_layout)?;

        let mut ctx = RunContext::new(run_layout, manifest);
        ctx.transition(RunState::Draft, "full run started")?;
        ctx.persist()?;
        info!(run_id = %run_id, run_dir = %ctx.layout.run_dir().display(), "Full run started");

        let runner = StageRunner {
            project: &self.project,
            provider: &*self.provider,
            policy: &policy,
        };
        for stage in Stage::before_curator() {
            runner.run(&mut ctx, *stage)?;
        }

        let qc_file = self.project.artifact_file(ArtifactKey::QcReport);
        let qc_text = layout::read_text(&ctx.layout.artifact_path(&qc_file))?;
        let status = gate::parse_quality_status(&qc_text);
        ctx.manifest
            .record_gate(Gate::Qc, GateDecision::from(status), &qc_file);
        ctx.persist()?;
        info!(run_id = %run_id, decision = %GateDecision::from(status), "QC gate recorded");

        let stop_on_fail = self.project.config.policy.stop_on_qc_fail;
        if status != QualityStatus::Pass && stop_on_fail {
            warn!(
                run_id = %run_id,
                decision = %GateDecision::from(status),
                "Quality review did not pass, stopping before curator"
            );
            self.halt(
                &mut ctx,
                RunState::StoppedQcFail,
                &format!("qc gate {}", GateDecision::from(status)),
                EventKind::RunStopped,
            )?;
        } else {
            self.halt(
                &mut ctx,
                RunState::ReadyForCurator,
                &format!("qc gate {}, awaiting curator", GateDecision::from(status)),
                EventKind::RunHalted,
            )?;
        }

        Ok(ctx.into_outcome())
    }

    /// Resume a run after the curator decision has been written
    pub fn resume(&self, run_dir: &Path) -> Result<RunOutcome, PipelineError> {
        let run_layout = RunLayout::at(run_dir);
        let curator_file = self.project.artifact_file(ArtifactKey::CuratorDecision);
        let curator_path = run_layout.artifact_path(&curator_file);
        if !curator_path.is_file() {
            return Err(PipelineError::MissingInput {
                stage: Stage::Distribution.as_str().to_string(),
                artifact: ArtifactKey::CuratorDecision.as_str().to_string(),
                path: curator_path,
            });
        }

        let manifest = match self.load_prior_manifest(&run_layout) {
            Some(mut manifest) => {
                if !manifest.state().accepts_resume() {
                    return Err(PipelineError::InvalidResumeState {
                        state: manifest.state(),
                    });
                }
                manifest.begin_invocation(RunMode::Resume);
                manifest
            }
            None => {
                let inputs = fingerprint_inputs(&self.project)?;
                RunManifest::initialize(run_layout.run_id(), RunMode::Resume, inputs)
            }
        };

        let mut ctx = RunContext::new(run_layout, manifest);
        ctx.persist()?;
        info!(run_id = %ctx.run_id(), "Run resumed");

        let decision = gate::parse_curator_approval(&layout::read_text(&curator_path)?);
        ctx.manifest
            .record_gate(Gate::Curator, GateDecision::from(decision), &curator_file);
        ctx.persist()?;

        match decision {
            CuratorDecision::Approved => {
                ctx.transition(RunState::Approved, "curator approved")?;
                let policy = load_policy_documents(&self.project)?;
                let runner = StageRunner {
                    project: &self.project,
                    provider: &*self.provider,
                    policy: &policy,
                };
                runner.run(&mut ctx, Stage::Distribution)?;
                self.halt(
                    &mut ctx,
                    RunState::PostBundleReady,
                    "post bundle written",
                    EventKind::RunStopped,
                )?;
            }
            CuratorDecision::Veto | CuratorDecision::Unknown => {
                warn!(
                    run_id = %ctx.run_id(),
                    decision = %GateDecision::from(decision),
                    "Curator did not approve, stopping"
                );
                self.halt(
                    &mut ctx,
                    RunState::CuratorVetoed,
                    &format!("curator decision {}", GateDecision::from(decision)),
                    EventKind::RunStopped,
                )?;
            }
        }

        Ok(ctx.into_outcome())
    }

    /// Prior manifest for the run, if one exists and parses
    fn load_prior_manifest(&self, run_layout: &RunLayout) -> Option<RunManifest> {
        match RunManifest::load(&run_layout.manifest_path()) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(
                    path = %run_layout.manifest_path().display(),
                    error = %err,
                    "Prior manifest unreadable, rebuilding from current configuration"
                );
                None
            }
        }
    }

    /// Discard the curator review of a previous invocation
    ///
    /// A full run regenerates every artifact the curator saw, so the recorded curator gate,
    /// the distribution output and the filled-in decision file no longer apply.
    fn supersede_curator_review(
        &self,
        run_layout: &RunLayout,
        manifest: &mut RunManifest,
    ) -> Result<(), StorageError> {
        let post_plan = Stage::Distribution.artifact();
        let dropped = manifest.supersede(&[Gate::Curator], &[post_plan.as_str()]);
        layout::remove_if_exists(&run_layout.artifact_path(&self.project.artifact_file(post_plan)))?;
        layout::remove_if_exists(&run_layout.post_bundle_dir())?;
        layout::remove_if_exists(
            &run_layout.artifact_path(&self.project.artifact_file(ArtifactKey::CuratorDecision)),
        )?;
        if dropped {
            info!(run_id = %manifest.run.id, "Previous curator review superseded");
        }
        Ok(())
    }

    fn ensure_curator_template(&self, run_layout: &RunLayout) -> Result<(), StorageError> {
        let destination =
            run_layout.artifact_path(&self.project.artifact_file(ArtifactKey::CuratorDecision));
        let template = self.project.curator_template_path();
        if template.is_file() {
            layout::copy_if_absent(&template, &destination)?;
        } else if !destination.exists() {
            layout::write_text(&destination, DEFAULT_CURATOR_TEMPLATE)?;
        }
        Ok(())
    }

    /// Enter a halting state: transition, marker file, event, persist
    fn halt(
        &self,
        ctx: &mut RunContext,
        state: RunState,
        reason: &str,
        kind: EventKind,
    ) -> Result<(), StorageError> {
        ctx.transition(state, reason)?;
        markers::write_marker(
            &ctx.layout,
            state,
            &self.project.artifact_file(ArtifactKey::CuratorDecision),
        )?;
        ctx.record_event(kind, json!({ "state": state.as_str(), "reason": reason }))?;
        info!(run_id = %ctx.run_id(), state = %state, "Run halted");
        Ok(())
    }
}
