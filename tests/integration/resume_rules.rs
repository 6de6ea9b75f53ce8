//! Resume preconditions and manifest recovery

use crate::integration::{ScriptedProvider, Studio};
use reelflow::error::PipelineError;
use reelflow::gate::{parse_curator_approval, CuratorDecision, Gate, GateDecision};
use reelflow::manifest::{EventKind, RunMode, RunState};

#[test]
fn test_resume_without_curator_file_fails() {
    let studio = Studio::new();
    studio.run_full("nofile").unwrap();
    std::fs::remove_file(studio.run_dir("nofile").join("curator_decision.md")).unwrap();

    let err = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("nofile"))
        .unwrap_err();

    match err {
        PipelineError::MissingInput { artifact, path, .. } => {
            assert_eq!(artifact, "curator_decision");
            assert!(path.ends_with("curator_decision.md"));
        }
        other => panic!("expected missing input, got {other}"),
    }
    assert_eq!(studio.manifest("nofile").state(), RunState::ReadyForCurator);
}

#[test]
fn test_resume_rebuilds_corrupt_manifest() {
    let studio = Studio::new();
    studio.run_full("corrupt").unwrap();
    studio.decide("corrupt", "yes");
    std::fs::write(
        studio.run_dir("corrupt").join("manifest.yaml"),
        "run: [this is not a manifest\n",
    )
    .unwrap();

    let outcome = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("corrupt"))
        .unwrap();
    assert_eq!(outcome.state, RunState::PostBundleReady);

    let manifest = studio.manifest("corrupt");
    assert_eq!(manifest.run.id, "2026-01-05_corrupt");
    assert_eq!(manifest.run.mode, RunMode::Resume);
    assert!(manifest.inputs.config.is_some());
    assert_eq!(
        manifest.gate(Gate::Curator).unwrap().decision,
        GateDecision::Approved
    );
    // Only what this invocation produced is known
    assert_eq!(manifest.outputs.len(), 1);
    assert!(manifest.outputs.contains_key("post_plan"));
}

#[test]
fn test_resume_without_manifest_uses_fresh_one() {
    let studio = Studio::new();
    studio.run_full("lost").unwrap();
    studio.decide("lost", "no");
    std::fs::remove_file(studio.run_dir("lost").join("manifest.yaml")).unwrap();

    let outcome = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("lost"))
        .unwrap();
    assert_eq!(outcome.state, RunState::CuratorVetoed);
    assert_eq!(studio.manifest("lost").run.id, "2026-01-05_lost");
}

#[test]
fn test_resume_from_draft_is_rejected() {
    let studio = Studio::new();
    let provider = ScriptedProvider::new().with_response("lena", "# Scripts\n\nnothing yet\n");
    assert!(studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("halfway"))
        .is_err());
    studio.decide("halfway", "yes");

    let err = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("halfway"))
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidResumeState {
            state: RunState::Draft
        }
    ));
}

#[test]
fn test_second_full_run_appends_history() {
    let studio = Studio::new();
    studio.run_full("again").unwrap();
    let first = studio.manifest("again");

    let outcome = studio.run_full("again").unwrap();
    assert_eq!(outcome.state, RunState::ReadyForCurator);

    let second = studio.manifest("again");
    assert_eq!(second.run.created_at, first.run.created_at);
    assert!(second.run.state_history.len() > first.run.state_history.len());
    assert!(second.events.len() > first.events.len());
    assert_eq!(second.events_of(EventKind::RunStarted).count(), 2);
    assert_eq!(second.events[..first.events.len()], first.events[..]);
    // Same inputs, same deterministic outputs
    for (key, record) in &first.outputs {
        assert_eq!(second.outputs[key].digest, record.digest, "{} changed", key);
    }
}

#[test]
fn test_full_rerun_supersedes_curator_review() {
    let studio = Studio::new();
    studio.run_full("redo").unwrap();
    studio.decide("redo", "yes");
    let approved = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("redo"))
        .unwrap();
    assert_eq!(approved.state, RunState::PostBundleReady);
    let run_dir = studio.run_dir("redo");
    assert!(run_dir.join("post_bundle/post_plan.md").is_file());

    let outcome = studio.run_full("redo").unwrap();
    assert_eq!(outcome.state, RunState::ReadyForCurator);

    let manifest = studio.manifest("redo");
    assert_eq!(manifest.state(), RunState::ReadyForCurator);
    assert!(manifest.gate(Gate::Curator).is_none());
    assert!(manifest.gate(Gate::Qc).is_some());
    assert!(!manifest.outputs.contains_key("post_plan"));
    assert!(!run_dir.join("post_bundle").exists());
    assert!(!run_dir.join("POST_BUNDLE_READY.md").exists());
    assert!(run_dir.join("READY_FOR_CURATOR.md").is_file());

    let superseded: Vec<_> = manifest.events_of(EventKind::Superseded).collect();
    assert_eq!(superseded.len(), 1);
    assert_eq!(superseded[0].details["gates"], serde_json::json!(["curator"]));
    assert_eq!(superseded[0].details["outputs"], serde_json::json!(["post_plan"]));

    let text = std::fs::read_to_string(run_dir.join("curator_decision.md")).unwrap();
    assert_eq!(parse_curator_approval(&text), CuratorDecision::Unknown);
    assert!(!text.contains("- reviewed"));

    // The regenerated artifacts need a fresh decision
    let outcome = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&run_dir)
        .unwrap();
    assert_eq!(outcome.state, RunState::CuratorVetoed);
    assert!(outcome.stages_executed.is_empty());
    assert!(!run_dir.join("post_bundle/post_plan.md").exists());
}

#[test]
fn test_full_rerun_resets_pending_decision() {
    let studio = Studio::new();
    studio.run_full("pending").unwrap();
    studio.decide("pending", "yes");
    studio.run_full("pending").unwrap();

    let text =
        std::fs::read_to_string(studio.run_dir("pending").join("curator_decision.md")).unwrap();
    assert_eq!(parse_curator_approval(&text), CuratorDecision::Unknown);
    // Nothing had been approved yet, so nothing is superseded in the manifest
    assert_eq!(
        studio
            .manifest("pending")
            .events_of(EventKind::Superseded)
            .count(),
        0
    );
}
