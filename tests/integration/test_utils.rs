//! Shared test utilities for integration tests
//!
//! A `Studio` is a scaffolded project in a temporary directory. `ScriptedProvider` wraps the
//! stub provider and records every agent it is asked to run.

use reelflow::error::{PipelineError, ProviderError};
use reelflow::init;
use reelflow::layout::RunId;
use reelflow::manifest::RunManifest;
use reelflow::orchestrator::{Orchestrator, RunOutcome};
use reelflow::project::Project;
use reelflow::provider::{
    GenerationProvider, GenerationRequest, GenerationResponse, ProviderConfig, StubProvider,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Stub provider that records the agents it served
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: StubProvider,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `agent` with `text` instead of the stub output
    pub fn with_response(mut self, agent: &str, text: &str) -> Self {
        self.inner = self.inner.with_response(agent, text);
        self
    }

    /// Shared handle to the call log; stays valid after the provider is boxed
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

impl GenerationProvider for ScriptedProvider {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        config: &ProviderConfig,
    ) -> Result<GenerationResponse, ProviderError> {
        self.calls.lock().unwrap().push(request.agent.to_string());
        self.inner.generate(request, config)
    }
}

/// Scaffolded project in a temporary directory
pub struct Studio {
    dir: TempDir,
}

impl Studio {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let result = init::initialize_files(dir.path(), false);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("project.yaml")
    }

    /// Replace `from` with `to` in the project config
    pub fn edit_config(&self, from: &str, to: &str) {
        let raw = std::fs::read_to_string(self.config_path()).unwrap();
        assert!(raw.contains(from), "project.yaml has no '{}'", from);
        std::fs::write(self.config_path(), raw.replacen(from, to, 1)).unwrap();
    }

    pub fn project(&self) -> Project {
        Project::load(&self.config_path(), None).unwrap()
    }

    pub fn orchestrator(&self, provider: ScriptedProvider) -> Orchestrator<ScriptedProvider> {
        Orchestrator::new(self.project(), Box::new(provider))
    }

    pub fn run_id(slug: &str) -> RunId {
        RunId::new(Some("2026-01-05"), Some(slug)).unwrap()
    }

    /// Full run with a fresh provider
    pub fn run_full(&self, slug: &str) -> Result<RunOutcome, PipelineError> {
        self.orchestrator(ScriptedProvider::new())
            .run_full(&Self::run_id(slug))
    }

    pub fn run_dir(&self, slug: &str) -> PathBuf {
        self.root()
            .join("runs")
            .join("2026-01")
            .join(format!("2026-01-05_{}", slug))
    }

    /// Fill in the curator decision of a run
    pub fn decide(&self, slug: &str, approved: &str) {
        let path = self.run_dir(slug).join("curator_decision.md");
        std::fs::write(
            path,
            format!("# Curator Decision\n\nApproved: {}\n\n## Notes\n- reviewed\n", approved),
        )
        .unwrap();
    }

    pub fn manifest(&self, slug: &str) -> RunManifest {
        RunManifest::load(&self.run_dir(slug).join("manifest.yaml"))
            .unwrap()
            .expect("manifest exists")
    }
}
