//! Full run to the curator gate, then resume through distribution

use crate::integration::{ScriptedProvider, Studio};
use reelflow::gate::GateDecision;
use reelflow::manifest::{EventKind, RunState};
use reelflow::orchestrator::RENDER_BUNDLE_OUTPUT;
use reelflow::stage::Stage;

const PRE_CURATOR_FILES: [&str; 7] = [
    "trend_brief.md",
    "ideas.md",
    "approved_ideas.md",
    "scripts.md",
    "scene_plan.md",
    "render_report.md",
    "qc_report.md",
];

#[test]
fn test_full_run_halts_for_curator() {
    let studio = Studio::new();
    let provider = ScriptedProvider::new();
    let calls = provider.calls();

    let outcome = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("launch"))
        .unwrap();

    assert_eq!(outcome.state, RunState::ReadyForCurator);
    assert_eq!(outcome.run_id, "2026-01-05_launch");
    assert_eq!(outcome.run_dir, studio.run_dir("launch"));
    assert_eq!(outcome.stages_executed, Stage::before_curator().to_vec());
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["trend_scout", "theo", "mabel", "lena", "rowan", "evan", "qc"]
    );

    let run_dir = studio.run_dir("launch");
    for file in PRE_CURATOR_FILES {
        assert!(run_dir.join(file).is_file(), "{} missing", file);
    }
    for file in ["shot_01.txt", "voice.txt", "edit_notes.md"] {
        assert!(run_dir.join("render_prompts/v1").join(file).is_file());
    }
    assert!(run_dir.join("curator_decision.md").is_file());
    assert!(run_dir.join("READY_FOR_CURATOR.md").is_file());
    assert!(!run_dir.join("post_bundle/post_plan.md").exists());

    let manifest = studio.manifest("launch");
    assert_eq!(manifest.state(), RunState::ReadyForCurator);
    assert_eq!(manifest.gate(reelflow::gate::Gate::Qc).unwrap().decision, GateDecision::Pass);
    assert!(manifest.gate(reelflow::gate::Gate::Curator).is_none());
    assert!(manifest.outputs.contains_key(RENDER_BUNDLE_OUTPUT));
    assert_eq!(manifest.outputs["ideas"].path, "ideas.md");
    assert_eq!(manifest.events_of(EventKind::Generation).count(), 7);

    let states: Vec<RunState> = manifest
        .run
        .state_history
        .iter()
        .map(|entry| entry.state)
        .collect();
    assert_eq!(
        states,
        vec![
            RunState::Draft,
            RunState::Rendering,
            RunState::Qc,
            RunState::ReadyForCurator
        ]
    );
}

#[test]
fn test_resume_approved_runs_only_distribution() {
    let studio = Studio::new();
    studio.run_full("approve").unwrap();
    let before = studio.manifest("approve");
    studio.decide("approve", "yes");

    let provider = ScriptedProvider::new();
    let calls = provider.calls();
    let outcome = studio
        .orchestrator(provider)
        .resume(&studio.run_dir("approve"))
        .unwrap();

    assert_eq!(outcome.state, RunState::PostBundleReady);
    assert_eq!(outcome.stages_executed, vec![Stage::Distribution]);
    assert_eq!(*calls.lock().unwrap(), vec!["parker"]);

    let run_dir = studio.run_dir("approve");
    assert!(run_dir.join("post_bundle/post_plan.md").is_file());
    assert!(run_dir.join("POST_BUNDLE_READY.md").is_file());
    assert!(!run_dir.join("READY_FOR_CURATOR.md").exists());

    let manifest = studio.manifest("approve");
    assert_eq!(
        manifest.gate(reelflow::gate::Gate::Curator).unwrap().decision,
        GateDecision::Approved
    );
    assert_eq!(manifest.outputs["post_plan"].path, "post_bundle/post_plan.md");
    assert_eq!(manifest.outputs.len(), before.outputs.len() + 1);
    // Earlier outputs survive untouched
    assert_eq!(manifest.outputs["ideas"], before.outputs["ideas"]);
    assert_eq!(manifest.inputs, before.inputs);
    assert_eq!(manifest.events_of(EventKind::RunResumed).count(), 1);

    let tail: Vec<RunState> = manifest
        .run
        .state_history
        .iter()
        .rev()
        .take(2)
        .map(|entry| entry.state)
        .collect();
    assert_eq!(tail, vec![RunState::PostBundleReady, RunState::Approved]);
}

#[test]
fn test_resume_vetoed_runs_nothing() {
    let studio = Studio::new();
    studio.run_full("veto").unwrap();
    studio.decide("veto", "No");

    let provider = ScriptedProvider::new();
    let calls = provider.calls();
    let outcome = studio
        .orchestrator(provider)
        .resume(&studio.run_dir("veto"))
        .unwrap();

    assert_eq!(outcome.state, RunState::CuratorVetoed);
    assert!(outcome.stages_executed.is_empty());
    assert!(calls.lock().unwrap().is_empty());

    let run_dir = studio.run_dir("veto");
    assert!(!run_dir.join("post_bundle/post_plan.md").exists());
    assert!(run_dir.join("CURATOR_VETOED.md").is_file());
    assert_eq!(
        studio
            .manifest("veto")
            .gate(reelflow::gate::Gate::Curator)
            .unwrap()
            .decision,
        GateDecision::Veto
    );
}

#[test]
fn test_untouched_template_is_not_approval() {
    let studio = Studio::new();
    studio.run_full("blank").unwrap();

    let outcome = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("blank"))
        .unwrap();

    assert_eq!(outcome.state, RunState::CuratorVetoed);
    assert_eq!(
        studio
            .manifest("blank")
            .gate(reelflow::gate::Gate::Curator)
            .unwrap()
            .decision,
        GateDecision::Unknown
    );
}

#[test]
fn test_veto_then_approve_on_second_resume() {
    let studio = Studio::new();
    studio.run_full("change").unwrap();
    studio.decide("change", "no");
    let first = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("change"))
        .unwrap();
    assert_eq!(first.state, RunState::CuratorVetoed);

    studio.decide("change", "true");
    let second = studio
        .orchestrator(ScriptedProvider::new())
        .resume(&studio.run_dir("change"))
        .unwrap();
    assert_eq!(second.state, RunState::PostBundleReady);
    assert!(!studio.run_dir("change").join("CURATOR_VETOED.md").exists());
    assert_eq!(
        studio.manifest("change").events_of(EventKind::RunResumed).count(),
        2
    );
}
