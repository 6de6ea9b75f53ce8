//! Generation Provider Abstraction
//!
//! One blocking `generate` call per stage. The orchestrator only sees the
//! [`GenerationProvider`] trait, so the deterministic stub and any real backend are
//! interchangeable. Retries, if any, live inside a provider.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

pub mod profile;
pub mod retry;
pub mod stub;

pub use profile::ProviderConfig;
pub use retry::RetryingProvider;
pub use stub::StubProvider;

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Input to one generation call
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Agent identity, e.g. `theo`
    pub agent: &'a str,
    pub system_prompt: &'a str,
    pub user_payload: &'a str,
}

/// Output of one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub provider_name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Generation provider trait
pub trait GenerationProvider {
    /// Produce the agent's markdown output for one stage
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        config: &ProviderConfig,
    ) -> Result<GenerationResponse, ProviderError>;
}

impl<P: GenerationProvider + ?Sized> GenerationProvider for Box<P> {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        config: &ProviderConfig,
    ) -> Result<GenerationResponse, ProviderError> {
        (**self).generate(request, config)
    }
}

/// Factory for creating providers from resolved configuration
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider named by `config`
    ///
    /// Only the built-in `stub` provider is available; when `max_retries` is set the
    /// provider is wrapped in a [`RetryingProvider`] sleeping `retry_backoff_ms` between
    /// attempts.
    pub fn create(config: &ProviderConfig) -> Result<Box<dyn GenerationProvider>, ProviderError> {
        let provider: Box<dyn GenerationProvider> = match config.name.as_str() {
            "stub" => Box::new(StubProvider::new()),
            other => {
                return Err(ProviderError::NotConfigured(format!(
                    "unknown provider '{}' (available: stub)",
                    other
                )))
            }
        };

        match config.max_retries() {
            Some(retries) if retries > 0 => {
                let retrying = RetryingProvider::new(provider, retries)
                    .with_backoff(config.retry_backoff().unwrap_or_default());
                Ok(Box::new(retrying))
            }
            _ => Ok(provider),
        }
    }
}
