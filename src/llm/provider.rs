use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

use super::LlmError;

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// A text-completion provider: takes a system prompt + user message and
/// returns the raw completion text. Retry policy lives in the client, not
/// here; providers only classify failures as transient or fatal.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;

    /// Provider name for logging / response metadata.
    fn name(&self) -> &str;
}

/// Map an upstream HTTP status to the retryable/fatal split: rate limits and
/// server errors are worth retrying, everything else is not.
fn classify_status(provider: &str, status: reqwest::StatusCode, body: String) -> LlmError {
    let msg = format!("{provider} returned {status}: {body}");
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        LlmError::Transient(msg)
    } else {
        LlmError::Fatal(msg)
    }
}

fn classify_transport(provider: &str, err: reqwest::Error) -> LlmError {
    LlmError::Transient(format!("{provider} request failed: {err}"))
}

// ---------------------------------------------------------------------------
// Gemini provider
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct GeminiProvider {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiSystemInstruction,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiPart>,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey("gemini".to_string()));
        }
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            client: reqwest::Client::new(),
        })
    }
}

impl CompletionProvider for GeminiProvider {
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/{}:generateContent", self.endpoint, self.model);

            let body = GeminiRequest {
                system_instruction: GeminiSystemInstruction {
                    parts: vec![GeminiPart {
                        text: system_prompt.to_string(),
                    }],
                },
                contents: vec![GeminiContent {
                    parts: vec![GeminiPart {
                        text: user_message.to_string(),
                    }],
                }],
                generation_config: GeminiGenerationConfig {
                    max_output_tokens: 64,
                    temperature: 0.7,
                },
            };

            let resp = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| classify_transport("gemini", e))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(classify_status("gemini", status, text));
            }

            let parsed: GeminiResponse = resp
                .json()
                .await
                .map_err(|e| LlmError::Fatal(format!("gemini response parse: {e}")))?;

            parsed
                .candidates
                .first()
                .and_then(|c| c.content.parts.first())
                .map(|p| p.text.clone())
                .ok_or_else(|| LlmError::Fatal("gemini returned no candidates".to_string()))
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible provider (OpenAI, xAI, DeepSeek)
// ---------------------------------------------------------------------------

/// Works with any OpenAI-compatible chat-completions API.
#[derive(Debug)]
pub struct OpenAiCompatible {
    pub provider_name: String,
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize, Clone)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

impl OpenAiCompatible {
    pub fn new(provider_name: &str, config: &ProviderConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey(provider_name.to_string()));
        }
        Ok(Self {
            provider_name: provider_name.to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            client: reqwest::Client::new(),
        })
    }
}

impl CompletionProvider for OpenAiCompatible {
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let body = OpenAiRequest {
                model: self.model.clone(),
                messages: vec![
                    OpenAiMessage {
                        role: "system".to_string(),
                        content: system_prompt.to_string(),
                    },
                    OpenAiMessage {
                        role: "user".to_string(),
                        content: user_message.to_string(),
                    },
                ],
                max_tokens: 64,
                temperature: 0.7,
            };

            let resp = self
                .client
                .post(&self.endpoint)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|e| classify_transport(&self.provider_name, e))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(classify_status(&self.provider_name, status, text));
            }

            let parsed: OpenAiResponse = resp.json().await.map_err(|e| {
                LlmError::Fatal(format!("{} response parse: {e}", self.provider_name))
            })?;

            parsed
                .choices
                .first()
                .map(|c| c.message.content.clone())
                .ok_or_else(|| {
                    LlmError::Fatal(format!("{} returned no choices", self.provider_name))
                })
        })
    }

    fn name(&self) -> &str {
        &self.provider_name
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Create a completion provider from a provider name and config.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn CompletionProvider>, LlmError> {
    match name {
        "gemini" => Ok(Box::new(GeminiProvider::new(config)?)),
        "openai" | "xai" | "deepseek" => Ok(Box::new(OpenAiCompatible::new(name, config)?)),
        other => Err(LlmError::UnsupportedProvider(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(key: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: key.to_string(),
            model: "test-model".to_string(),
            endpoint: "https://example.com".to_string(),
        }
    }

    #[test]
    fn gemini_rejects_empty_key() {
        let result = GeminiProvider::new(&cfg(""));
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn openai_compatible_rejects_empty_key() {
        let result = OpenAiCompatible::new("openai", &cfg(""));
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn gemini_accepts_valid_key() {
        let provider = GeminiProvider::new(&cfg("gem-test")).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model, "test-model");
    }

    #[test]
    fn factory_creates_gemini() {
        let p = create_provider("gemini", &cfg("gem-test")).unwrap();
        assert_eq!(p.name(), "gemini");
    }

    #[test]
    fn factory_creates_openai_family() {
        for name in ["openai", "xai", "deepseek"] {
            let p = create_provider(name, &cfg("sk-test")).unwrap();
            assert_eq!(p.name(), name);
        }
    }

    #[test]
    fn factory_rejects_unknown() {
        assert!(matches!(
            create_provider("unknown", &cfg("key")),
            Err(LlmError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        let e = classify_status("gemini", reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(e.is_transient());
        let e = classify_status("gemini", reqwest::StatusCode::BAD_GATEWAY, String::new());
        assert!(e.is_transient());
    }

    #[test]
    fn auth_errors_are_fatal() {
        let e = classify_status("gemini", reqwest::StatusCode::UNAUTHORIZED, "bad key".into());
        assert!(!e.is_transient());
        let e = classify_status("openai", reqwest::StatusCode::FORBIDDEN, String::new());
        assert!(!e.is_transient());
        let e = classify_status("openai", reqwest::StatusCode::BAD_REQUEST, String::new());
        assert!(!e.is_transient());
    }
}
