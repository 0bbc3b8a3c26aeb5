//! Retrying wrapper around a completion provider.
//!
//! Per call: optional fixed throttle delay, then up to `max_retries + 1`
//! attempts with exponential backoff between transient failures, the whole
//! sequence capped by an optional time budget. Fatal errors short-circuit;
//! only transient ones are retried.

use std::time::Duration;

use crate::config::{LlmConfig, RetryPolicy};

use super::provider::{CompletionProvider, create_provider};
use super::LlmError;

pub struct MoveClient {
    provider: Box<dyn CompletionProvider>,
    policy: RetryPolicy,
}

impl MoveClient {
    pub fn new(provider: Box<dyn CompletionProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Build a client from config: the preferred provider if it has a key,
    /// otherwise any keyed provider.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let name = match config.provider_config(&config.provider) {
            Some(pc) if !pc.api_key.is_empty() => config.provider.as_str(),
            _ => config
                .auto_detect_provider()
                .ok_or_else(|| LlmError::MissingApiKey(config.provider.clone()))?,
        };
        let pc = config
            .provider_config(name)
            .ok_or_else(|| LlmError::UnsupportedProvider(name.to_string()))?;
        Ok(Self::new(create_provider(name, pc)?, config.retry.clone()))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Request a completion, retrying transient failures.
    pub async fn request_completion(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        match self.policy.budget {
            Some(budget) => {
                tokio::time::timeout(budget, self.attempt_loop(system_prompt, user_message))
                    .await
                    .unwrap_or_else(|_| {
                        Err(LlmError::Fatal(format!(
                            "provider {} timed out after {budget:?}",
                            self.provider.name()
                        )))
                    })
            }
            None => self.attempt_loop(system_prompt, user_message).await,
        }
    }

    async fn attempt_loop(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let attempts = self.policy.max_retries + 1;
        let mut last_failure = String::new();

        for attempt in 0..attempts {
            if !self.policy.throttle.is_zero() {
                tokio::time::sleep(self.policy.throttle).await;
            }

            match self.provider.complete(system_prompt, user_message).await {
                Ok(text) => {
                    tracing::debug!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        "completion succeeded"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_transient() => {
                    last_failure = e.to_string();
                    if attempt + 1 < attempts {
                        let delay = backoff_delay(self.policy.backoff_base, attempt);
                        tracing::warn!(
                            provider = self.provider.name(),
                            attempt = attempt + 1,
                            retry_in_ms = delay.as_millis() as u64,
                            error = %last_failure,
                            "transient provider failure, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        error = %e,
                        "fatal provider failure"
                    );
                    return Err(e);
                }
            }
        }

        Err(LlmError::Exhausted {
            attempts,
            last: last_failure,
        })
    }
}

/// Wait before retry `attempt` (0-based): `base * 2^attempt`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
