//! Contract violations stop the run and leave a report next to the artifact

use crate::integration::{ScriptedProvider, Studio};
use reelflow::error::PipelineError;
use reelflow::manifest::{EventKind, RunState};

#[test]
fn test_violation_stops_downstream_stages() {
    let studio = Studio::new();
    let provider =
        ScriptedProvider::new().with_response("theo", "# Ideas\n\nNothing numbered here.\n");
    let calls = provider.calls();

    let err = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("broken"))
        .unwrap_err();

    let report = match err {
        PipelineError::ContractViolation {
            stage,
            artifact,
            message,
            report,
        } => {
            assert_eq!(stage, "ideation");
            assert_eq!(artifact, "ideas");
            assert_eq!(message, "Missing required marker (any of): ## Idea 1, 1.");
            report
        }
        other => panic!("expected contract violation, got {other}"),
    };

    let run_dir = studio.run_dir("broken");
    assert_eq!(report, run_dir.join("ideas.md.violation.md"));
    let report_text = std::fs::read_to_string(&report).unwrap();
    assert!(report_text.contains("Missing required marker"));
    assert!(report_text.contains("ideation"));

    // The offending artifact stays for inspection; nothing after it ran
    assert!(run_dir.join("ideas.md").is_file());
    assert!(!run_dir.join("approved_ideas.md").exists());
    assert_eq!(*calls.lock().unwrap(), vec!["trend_scout", "theo"]);

    let manifest = studio.manifest("broken");
    assert_eq!(manifest.state(), RunState::Draft);
    assert!(!manifest.outputs.contains_key("ideas"));
    assert!(manifest.outputs.contains_key("trend_brief"));
    let violations: Vec<_> = manifest.events_of(EventKind::ContractViolation).collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].details["artifact"], "ideas");
    assert_eq!(manifest.events_of(EventKind::StageFailed).count(), 0);
}

#[test]
fn test_violation_during_rendering_keeps_rendering_state() {
    let studio = Studio::new();
    let provider =
        ScriptedProvider::new().with_response("evan", "# Render Report\n\nno bundle section\n");

    let err = studio
        .orchestrator(provider)
        .run_full(&Studio::run_id("render"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::ContractViolation { .. }));

    let run_dir = studio.run_dir("render");
    assert!(run_dir.join("render_report.md.violation.md").is_file());
    assert!(!run_dir.join("render_prompts/v1/shot_01.txt").exists());
    assert_eq!(studio.manifest("render").state(), RunState::Rendering);
}

#[test]
fn test_missing_prompt_is_recorded_as_failure() {
    let studio = Studio::new();
    std::fs::remove_file(studio.root().join("agents/mabel.md")).unwrap();

    let err = studio.run_full("noprompt").unwrap_err();
    match err {
        PipelineError::MissingPrompt { agent, .. } => assert_eq!(agent, "mabel"),
        other => panic!("expected missing prompt, got {other}"),
    }

    let manifest = studio.manifest("noprompt");
    let failures: Vec<_> = manifest.events_of(EventKind::StageFailed).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].details["stage"], "selection");
    assert!(!manifest.inputs.prompts.contains_key("mabel"));
}
