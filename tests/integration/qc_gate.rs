//! Quality gate: FAIL and UNKNOWN stop before the curator when configured to

use crate::integration::{ScriptedProvider, Studio};
use reelflow::error::PipelineError;
use reelflow::gate::{Gate, GateDecision};
use reelflow::manifest::{EventKind, RunState};

#[test]
fn test_qc_fail_stops_run() {
    let studio = Studio::new();
    studio.edit_config("# stub_qc_status: FAIL", "stub_qc_status: FAIL");

    let outcome = studio.run_full("failing").unwrap();
    assert_eq!(outcome.state, RunState::StoppedQcFail);
    assert_eq!(outcome.stages_executed.len(), 7);

    let run_dir = studio.run_dir("failing");
    assert!(run_dir.join("STOPPED_QC_FAIL.md").is_file());
    assert!(!run_dir.join("READY_FOR_CURATOR.md").exists());

    let manifest = studio.manifest("failing");
    assert_eq!(manifest.gate(Gate::Qc).unwrap().decision, GateDecision::Fail);
    assert_eq!(manifest.events_of(EventKind::RunStopped).count(), 1);
    assert_eq!(manifest.events_of(EventKind::RunHalted).count(), 0);
}

#[test]
fn test_qc_fail_refuses_resume_even_if_approved() {
    let studio = Studio::new();
    studio.edit_config("# stub_qc_status: FAIL", "stub_qc_status: FAIL");
    studio.run_full("blocked").unwrap();
    studio.decide("blocked", "yes");

    let provider = ScriptedProvider::new();
    let calls = provider.calls();
    let err = studio
        .orchestrator(provider)
        .resume(&studio.run_dir("blocked"))
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::InvalidResumeState {
            state: RunState::StoppedQcFail
        }
    ));
    assert!(calls.lock().unwrap().is_empty());
    assert!(!studio.run_dir("blocked").join("post_bundle/post_plan.md").exists());
    assert_eq!(studio.manifest("blocked").state(), RunState::StoppedQcFail);
}

#[test]
fn test_qc_fail_continues_when_not_stopping() {
    let studio = Studio::new();
    studio.edit_config("# stub_qc_status: FAIL", "stub_qc_status: FAIL");
    studio.edit_config("stop_on_qc_fail: true", "stop_on_qc_fail: false");

    let outcome = studio.run_full("lenient").unwrap();
    assert_eq!(outcome.state, RunState::ReadyForCurator);
    assert_eq!(
        studio.manifest("lenient").gate(Gate::Qc).unwrap().decision,
        GateDecision::Fail
    );
}

#[test]
fn test_qc_unknown_status_stops_run() {
    let studio = Studio::new();
    // Satisfies the contract marker but is not a bare status line
    let provider = ScriptedProvider::new().with_response(
        "qc",
        "# QC Report\n\n## Checks\n- looked fine\n\n**Status:** PASS pending review\n",
    );

    let outcome = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("unclear"))
        .unwrap();

    assert_eq!(outcome.state, RunState::StoppedQcFail);
    assert_eq!(
        studio.manifest("unclear").gate(Gate::Qc).unwrap().decision,
        GateDecision::Unknown
    );
}

#[test]
fn test_bare_pass_status_reaches_curator() {
    let studio = Studio::new();
    let provider = ScriptedProvider::new().with_response(
        "qc",
        "# QC Report\n\n## Checks\n- hook lands in the first second\n\n**Status:** PASS\n",
    );

    let outcome = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("bare_pass"))
        .unwrap();

    assert_eq!(outcome.state, RunState::ReadyForCurator);
    assert!(studio.run_dir("bare_pass").join("READY_FOR_CURATOR.md").is_file());
    assert_eq!(
        studio.manifest("bare_pass").gate(Gate::Qc).unwrap().decision,
        GateDecision::Pass
    );
}

#[test]
fn test_bare_fail_status_stops_run() {
    let studio = Studio::new();
    let provider = ScriptedProvider::new().with_response(
        "qc",
        "# QC Report\n\n## Checks\n- captions overlap the safe zone\n\n**Status:** FAIL\n",
    );

    let outcome = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("bare_fail"))
        .unwrap();

    assert_eq!(outcome.state, RunState::StoppedQcFail);
    assert!(studio.run_dir("bare_fail").join("STOPPED_QC_FAIL.md").is_file());
    assert_eq!(
        studio.manifest("bare_fail").gate(Gate::Qc).unwrap().decision,
        GateDecision::Fail
    );
}

#[test]
fn test_unspaced_bullet_status_passes() {
    let studio = Studio::new();
    let provider = ScriptedProvider::new().with_response(
        "qc",
        "# QC Report\n\n## Checks\n- ok\n\n-**Status:** PASS\n",
    );

    let outcome = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("tight_bullet"))
        .unwrap();

    assert_eq!(outcome.state, RunState::ReadyForCurator);
}
