//! Deterministic stand-in provider.
//!
//! Output depends only on the agent, the payload and the config, so identical inputs give
//! byte-identical artifacts. The markdown it emits satisfies the default artifact contracts.

use super::{GenerationProvider, GenerationRequest, GenerationResponse, ProviderConfig, TokenUsage};
use crate::error::ProviderError;
use crate::hasher;
use std::collections::HashMap;

/// Deterministic provider used until a real client is wired
#[derive(Debug, Clone, Default)]
pub struct StubProvider {
    overrides: HashMap<String, String>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `text` verbatim whenever `agent` is asked to generate
    pub fn with_response(mut self, agent: impl Into<String>, text: impl Into<String>) -> Self {
        self.overrides.insert(agent.into(), text.into());
        self
    }

    fn render(&self, agent: &str, payload_digest: &str, config: &ProviderConfig) -> String {
        if let Some(text) = self.overrides.get(agent) {
            return text.clone();
        }

        let reference = &payload_digest[..12];
        match agent {
            "trend_scout" => format!(
                "# Trend Brief\n\n\
                 ## Signals\n\
                 - Short loops with a single visual gag\n\
                 - Behind-the-scenes process clips\n\n\
                 ## Sources\n\
                 - stub ({})\n",
                reference
            ),
            "theo" => format!(
                "# Ideas\n\n\
                 ## Idea 1\n\
                 Morning routine told in five cuts.\n\n\
                 ## Idea 2\n\
                 One prop, three reveals.\n\n\
                 Reference: {}\n",
                reference
            ),
            "mabel" => format!(
                "# Approved Ideas\n\n\
                 ## Approved\n\
                 - Idea 1: Morning routine told in five cuts.\n\n\
                 ## Rejected\n\
                 - Idea 2: Off-profile.\n\n\
                 Reference: {}\n",
                reference
            ),
            "lena" => format!(
                "# Scripts\n\n\
                 ## Script 1\n\
                 HOOK: It starts before the alarm.\n\
                 BODY: Five cuts, no words.\n\
                 CTA: Follow for part two.\n\n\
                 Reference: {}\n",
                reference
            ),
            "rowan" => format!(
                "# Scene Plan\n\n\
                 ## Shots\n\
                 1. Close-up, alarm clock, 2s\n\
                 2. Wide, kitchen, 4s\n\n\
                 Reference: {}\n",
                reference
            ),
            "evan" => format!(
                "# Render Report\n\n\
                 ## Prompt Bundle\n\
                 - render_prompts/v1/shot_01.txt\n\
                 - render_prompts/v1/voice.txt\n\
                 - render_prompts/v1/edit_notes.md\n\n\
                 Reference: {}\n",
                reference
            ),
            "qc" => {
                let status = match config.stub_qc_status() {
                    Some(status) if status.eq_ignore_ascii_case("fail") => "FAIL",
                    _ => "PASS",
                };
                format!(
                    "# QC Report\n\n\
                     ## Checks\n\
                     - Artifacts present: yes\n\
                     - Prompt bundle complete: yes\n\n\
                     - **Status:** {}\n\n\
                     Reference: {}\n",
                    status, reference
                )
            }
            "parker" => format!(
                "# Post Plan\n\n\
                 ## Captions\n\
                 - It starts before the alarm.\n\n\
                 ## Schedule\n\
                 - Next weekday, 07:30 local\n\n\
                 Reference: {}\n",
                reference
            ),
            other => format!("# {}\n\n(stub output)\n\nReference: {}\n", other, reference),
        }
    }
}

fn word_count(text: &str) -> u32 {
    text.split_whitespace().count().min(u32::MAX as usize) as u32
}

impl GenerationProvider for StubProvider {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        config: &ProviderConfig,
    ) -> Result<GenerationResponse, ProviderError> {
        let payload_digest = hasher::digest_text(&format!(
            "{}\n{}",
            request.agent, request.user_payload
        ));
        let text = self.render(request.agent, &payload_digest, config);

        let prompt_tokens = word_count(request.system_prompt) + word_count(request.user_payload);
        let completion_tokens = word_count(&text);

        Ok(GenerationResponse {
            text,
            provider_name: config.name.clone(),
            model: config.model.clone(),
            request_id: Some(format!("stub-{}", &payload_digest[..16])),
            usage: Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        })
    }
}
