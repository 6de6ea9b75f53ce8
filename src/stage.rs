//! The fixed stage catalogue.
//!
//! Every stage names its agent, the artifact it produces, the artifacts it consumes and a
//! payload builder. The sequence is closed: adding a stage means adding a variant here, and
//! every `match` over [`Stage`] has to account for it.

use crate::config::RunDefaults;
use crate::manifest::RunState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key identifying a produced (or externally supplied) artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKey {
    TrendBrief,
    Ideas,
    ApprovedIdeas,
    Scripts,
    ScenePlan,
    RenderReport,
    QcReport,
    CuratorDecision,
    PostPlan,
}

impl ArtifactKey {
    pub const ALL: [ArtifactKey; 9] = [
        ArtifactKey::TrendBrief,
        ArtifactKey::Ideas,
        ArtifactKey::ApprovedIdeas,
        ArtifactKey::Scripts,
        ArtifactKey::ScenePlan,
        ArtifactKey::RenderReport,
        ArtifactKey::QcReport,
        ArtifactKey::CuratorDecision,
        ArtifactKey::PostPlan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKey::TrendBrief => "trend_brief",
            ArtifactKey::Ideas => "ideas",
            ArtifactKey::ApprovedIdeas => "approved_ideas",
            ArtifactKey::Scripts => "scripts",
            ArtifactKey::ScenePlan => "scene_plan",
            ArtifactKey::RenderReport => "render_report",
            ArtifactKey::QcReport => "qc_report",
            ArtifactKey::CuratorDecision => "curator_decision",
            ArtifactKey::PostPlan => "post_plan",
        }
    }

    /// File name relative to the run directory when the project config has no override
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ArtifactKey::TrendBrief => "trend_brief.md",
            ArtifactKey::Ideas => "ideas.md",
            ArtifactKey::ApprovedIdeas => "approved_ideas.md",
            ArtifactKey::Scripts => "scripts.md",
            ArtifactKey::ScenePlan => "scene_plan.md",
            ArtifactKey::RenderReport => "render_report.md",
            ArtifactKey::QcReport => "qc_report.md",
            ArtifactKey::CuratorDecision => "curator_decision.md",
            ArtifactKey::PostPlan => "post_bundle/post_plan.md",
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown artifact key '{}'", s))
    }
}

/// A document handed to a payload builder: its display name and full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub name: String,
    pub text: String,
}

impl LoadedDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Everything a payload builder may read
#[derive(Debug, Clone)]
pub struct PayloadContext<'a> {
    pub defaults: &'a RunDefaults,
    /// Declared inputs, in the stage's declaration order
    pub inputs: &'a [(ArtifactKey, LoadedDocument)],
    pub taste_profile: &'a LoadedDocument,
    pub character_bible: &'a LoadedDocument,
}

impl<'a> PayloadContext<'a> {
    fn input(&self, key: ArtifactKey) -> Option<&'a LoadedDocument> {
        self.inputs
            .iter()
            .find(|(input_key, _)| *input_key == key)
            .map(|(_, document)| document)
    }
}

pub type PayloadBuilder = fn(&PayloadContext<'_>) -> String;

/// Static definition of one stage
#[derive(Debug, Clone, Copy)]
pub struct StageSpec {
    pub stage: Stage,
    pub agent: &'static str,
    pub artifact: ArtifactKey,
    pub inputs: &'static [ArtifactKey],
    pub build_payload: PayloadBuilder,
}

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TrendScan,
    Ideation,
    Selection,
    Scripting,
    ScenePlanning,
    Rendering,
    QualityReview,
    Distribution,
}

static STAGES: [StageSpec; 8] = [
    StageSpec {
        stage: Stage::TrendScan,
        agent: "trend_scout",
        artifact: ArtifactKey::TrendBrief,
        inputs: &[],
        build_payload: trend_scan_payload,
    },
    StageSpec {
        stage: Stage::Ideation,
        agent: "theo",
        artifact: ArtifactKey::Ideas,
        inputs: &[ArtifactKey::TrendBrief],
        build_payload: ideation_payload,
    },
    StageSpec {
        stage: Stage::Selection,
        agent: "mabel",
        artifact: ArtifactKey::ApprovedIdeas,
        inputs: &[ArtifactKey::Ideas],
        build_payload: selection_payload,
    },
    StageSpec {
        stage: Stage::Scripting,
        agent: "lena",
        artifact: ArtifactKey::Scripts,
        inputs: &[ArtifactKey::ApprovedIdeas],
        build_payload: scripting_payload,
    },
    StageSpec {
        stage: Stage::ScenePlanning,
        agent: "rowan",
        artifact: ArtifactKey::ScenePlan,
        inputs: &[ArtifactKey::Scripts],
        build_payload: scene_planning_payload,
    },
    StageSpec {
        stage: Stage::Rendering,
        agent: "evan",
        artifact: ArtifactKey::RenderReport,
        inputs: &[ArtifactKey::ScenePlan, ArtifactKey::Scripts],
        build_payload: rendering_payload,
    },
    StageSpec {
        stage: Stage::QualityReview,
        agent: "qc",
        artifact: ArtifactKey::QcReport,
        inputs: &[ArtifactKey::RenderReport],
        build_payload: quality_review_payload,
    },
    StageSpec {
        stage: Stage::Distribution,
        agent: "parker",
        artifact: ArtifactKey::PostPlan,
        inputs: &[ArtifactKey::CuratorDecision],
        build_payload: distribution_payload,
    },
];

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 8] = [
        Stage::TrendScan,
        Stage::Ideation,
        Stage::Selection,
        Stage::Scripting,
        Stage::ScenePlanning,
        Stage::Rendering,
        Stage::QualityReview,
        Stage::Distribution,
    ];

    /// Stages executed by a full run, ending at quality review
    pub fn before_curator() -> &'static [Stage] {
        const BEFORE_CURATOR: &[Stage] = &[
            Stage::TrendScan,
            Stage::Ideation,
            Stage::Selection,
            Stage::Scripting,
            Stage::ScenePlanning,
            Stage::Rendering,
            Stage::QualityReview,
        ];
        BEFORE_CURATOR
    }

    pub fn spec(&self) -> &'static StageSpec {
        match self {
            Stage::TrendScan => &STAGES[0],
            Stage::Ideation => &STAGES[1],
            Stage::Selection => &STAGES[2],
            Stage::Scripting => &STAGES[3],
            Stage::ScenePlanning => &STAGES[4],
            Stage::Rendering => &STAGES[5],
            Stage::QualityReview => &STAGES[6],
            Stage::Distribution => &STAGES[7],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::TrendScan => "trend_scan",
            Stage::Ideation => "ideation",
            Stage::Selection => "selection",
            Stage::Scripting => "scripting",
            Stage::ScenePlanning => "scene_planning",
            Stage::Rendering => "rendering",
            Stage::QualityReview => "quality_review",
            Stage::Distribution => "distribution",
        }
    }

    pub fn agent(&self) -> &'static str {
        self.spec().agent
    }

    pub fn artifact(&self) -> ArtifactKey {
        self.spec().artifact
    }

    pub fn inputs(&self) -> &'static [ArtifactKey] {
        self.spec().inputs
    }

    /// Run state entered when this stage starts, if it moves the state machine
    pub fn entry_state(&self) -> Option<RunState> {
        match self {
            Stage::Rendering => Some(RunState::Rendering),
            Stage::QualityReview => Some(RunState::Qc),
            Stage::TrendScan
            | Stage::Ideation
            | Stage::Selection
            | Stage::Scripting
            | Stage::ScenePlanning
            | Stage::Distribution => None,
        }
    }

    pub fn build_payload(&self, context: &PayloadContext<'_>) -> String {
        (self.spec().build_payload)(context)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn embed(out: &mut String, document: &LoadedDocument) {
    out.push_str("--- ");
    out.push_str(&document.name);
    out.push_str(" ---\n");
    out.push_str(&document.text);
    out.push('\n');
}

fn embed_input(out: &mut String, context: &PayloadContext<'_>, key: ArtifactKey) {
    if let Some(document) = context.input(key) {
        embed(out, document);
    }
}

fn trend_scan_payload(context: &PayloadContext<'_>) -> String {
    format!(
        "Window: {}\nRegion: {}\n",
        context.defaults.window, context.defaults.region
    )
}

fn ideation_payload(context: &PayloadContext<'_>) -> String {
    let mut out = format!("Batch size: {}\n\n", context.defaults.batch_size_ideas);
    embed_input(&mut out, context, ArtifactKey::TrendBrief);
    out
}

fn selection_payload(context: &PayloadContext<'_>) -> String {
    let mut out = String::new();
    embed(&mut out, context.taste_profile);
    out.push('\n');
    embed_input(&mut out, context, ArtifactKey::Ideas);
    out
}

fn scripting_payload(context: &PayloadContext<'_>) -> String {
    let mut out = format!(
        "Target length: {} seconds\n\n",
        context.defaults.target_seconds
    );
    embed_input(&mut out, context, ArtifactKey::ApprovedIdeas);
    out
}

fn scene_planning_payload(context: &PayloadContext<'_>) -> String {
    let mut out = String::new();
    embed(&mut out, context.character_bible);
    out.push('\n');
    embed_input(&mut out, context, ArtifactKey::Scripts);
    out
}

fn rendering_payload(context: &PayloadContext<'_>) -> String {
    let defaults = context.defaults;
    let mut out = format!(
        "Aspect ratio: {}\nResolution: {}\nTarget seconds: {}\n\n",
        defaults.aspect_ratio, defaults.resolution, defaults.target_seconds
    );
    embed_input(&mut out, context, ArtifactKey::ScenePlan);
    out.push('\n');
    embed_input(&mut out, context, ArtifactKey::Scripts);
    out
}

fn quality_review_payload(context: &PayloadContext<'_>) -> String {
    let mut out = String::new();
    embed_input(&mut out, context, ArtifactKey::RenderReport);
    out
}

fn distribution_payload(context: &PayloadContext<'_>) -> String {
    let mut out = String::new();
    embed_input(&mut out, context, ArtifactKey::CuratorDecision);
    out
}
