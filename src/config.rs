use std::time::Duration;

/// Credentials and addressing for one completion provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

/// Retry/backoff policy for the model client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (3 retries = 4 attempts total).
    pub max_retries: u32,
    /// Backoff base; the wait before retry `n` is `base * 2^n`.
    pub backoff_base: Duration,
    /// Fixed pre-call delay applied before every attempt. Coarse rate-limit
    /// protection, off by default.
    pub throttle: Duration,
    /// Overall budget for the whole attempt sequence, including waits.
    pub budget: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
            throttle: Duration::ZERO,
            budget: Some(Duration::from_secs(30)),
        }
    }
}

/// LLM provider selection and per-provider settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Preferred provider name; falls back to any provider with a key.
    pub provider: String,
    pub gemini: ProviderConfig,
    pub openai: ProviderConfig,
    pub retry: RetryPolicy,
}

impl LlmConfig {
    pub fn provider_config(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "gemini" => Some(&self.gemini),
            "openai" | "xai" | "deepseek" => Some(&self.openai),
            _ => None,
        }
    }

    /// First provider that actually has an API key configured.
    pub fn auto_detect_provider(&self) -> Option<&'static str> {
        if !self.gemini.api_key.is_empty() {
            Some("gemini")
        } else if !self.openai.api_key.is_empty() {
            Some("openai")
        } else {
            None
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            provider: "gemini".to_string(),
            gemini: ProviderConfig {
                api_key: String::new(),
                model: "gemini-2.5-flash-lite".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            },
            openai: ProviderConfig {
                api_key: String::new(),
                model: "gpt-4o-mini".to_string(),
                endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            },
            retry: RetryPolicy::default(),
        }
    }
}

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Skill rating embedded in prompts when the request omits one.
    pub default_skill: u32,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = LlmConfig::default();
        let retry_defaults = RetryPolicy::default();

        let budget_ms: u64 = env_parse("CHESS_LLM_TIMEOUT_MS", 30_000);

        AppConfig {
            port: env_parse("PORT", 8082),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            default_skill: env_parse("CHESS_DEFAULT_ELO", 1800),
            llm: LlmConfig {
                provider: std::env::var("CHESS_LLM_PROVIDER")
                    .unwrap_or_else(|_| "gemini".to_string()),
                gemini: ProviderConfig {
                    api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
                    model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                    endpoint: std::env::var("GEMINI_ENDPOINT").unwrap_or(defaults.gemini.endpoint),
                },
                openai: ProviderConfig {
                    api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                    model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.openai.model),
                    endpoint: std::env::var("OPENAI_ENDPOINT").unwrap_or(defaults.openai.endpoint),
                },
                retry: RetryPolicy {
                    max_retries: env_parse("CHESS_LLM_MAX_RETRIES", retry_defaults.max_retries),
                    backoff_base: Duration::from_millis(env_parse(
                        "CHESS_LLM_BACKOFF_MS",
                        retry_defaults.backoff_base.as_millis() as u64,
                    )),
                    throttle: Duration::from_millis(env_parse("CHESS_LLM_THROTTLE_MS", 0)),
                    budget: (budget_ms > 0).then(|| Duration::from_millis(budget_ms)),
                },
            },
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 8082,
            host: "0.0.0.0".to_string(),
            default_skill: 1800,
            llm: LlmConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8082);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_skill, 1800);
        assert_eq!(config.bind_addr(), "0.0.0.0:8082");
    }

    #[test]
    fn default_retry_policy() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.max_retries, 3);
        assert_eq!(retry.backoff_base, Duration::from_secs(1));
        assert_eq!(retry.throttle, Duration::ZERO);
        assert_eq!(retry.budget, Some(Duration::from_secs(30)));
    }

    #[test]
    fn provider_config_lookup() {
        let llm = LlmConfig::default();
        assert!(llm.provider_config("gemini").is_some());
        assert!(llm.provider_config("openai").is_some());
        assert!(llm.provider_config("xai").is_some());
        assert!(llm.provider_config("nope").is_none());
    }

    #[test]
    fn auto_detect_prefers_gemini() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.auto_detect_provider(), None);
        llm.openai.api_key = "sk-test".to_string();
        assert_eq!(llm.auto_detect_provider(), Some("openai"));
        llm.gemini.api_key = "gem-test".to_string();
        assert_eq!(llm.auto_detect_provider(), Some("gemini"));
    }
}
