//! Retry wrapper; the orchestrator never sees individual attempts.

use super::{GenerationProvider, GenerationRequest, GenerationResponse, ProviderConfig};
use crate::error::ProviderError;
use std::time::Duration;
use tracing::warn;

/// Retries a failing provider up to `max_retries` additional times
pub struct RetryingProvider<P> {
    inner: P,
    max_retries: u32,
    backoff: Duration,
}

impl<P: GenerationProvider> RetryingProvider<P> {
    pub fn new(inner: P, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            backoff: Duration::ZERO,
        }
    }

    /// Sleep between attempts, doubling after each failure
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<P: GenerationProvider> GenerationProvider for RetryingProvider<P> {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        config: &ProviderConfig,
    ) -> Result<GenerationResponse, ProviderError> {
        let mut delay = self.backoff;
        let mut attempt = 0;
        loop {
            match self.inner.generate(request, config) {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        agent = request.agent,
                        attempt,
                        max_retries = self.max_retries,
                        error = %err,
                        "Generation failed, retrying"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                        delay = next_delay(delay);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn next_delay(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}
