use crate::config::LlmConfig;
use crate::error::{PubmedRagError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a careful assistant. Answer ONLY using the provided context. \
If the answer is not present, say 'I cannot find this in the context.'";

/// Request structure for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

/// Response structure from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Heuristic answer used when no model answer is available:
/// the context up to its first period, trimmed. May be empty.
pub fn fallback_answer(context: &str) -> String {
    context.split('.').next().unwrap_or("").trim().to_string()
}

/// Chat-completions answerer: `answer(question, context) -> String`.
///
/// Never fails from the caller's point of view. Any API problem is logged and
/// replaced by [`fallback_answer`], so it can stand in for the naive extractor.
pub struct LlmAnswerer {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    endpoint: String,
}

impl LlmAnswerer {
    /// Create an answerer against an explicit endpoint and request timeout
    ///
    /// # Panics
    ///
    /// Panics if HTTP client cannot be created (should not happen in normal operation)
    pub(crate) fn with_client_settings(
        api_key: String,
        model: String,
        max_tokens: u32,
        endpoint: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
            max_tokens,
            endpoint,
        }
    }

    /// Build from `[llm]` config. Returns `None` when disabled or when the API
    /// key environment variable is unset or empty.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                log::info!(
                    "{} not set; candidate answers will use the naive extractor",
                    config.api_key_env
                );
                return None;
            }
        };
        Some(Self::with_client_settings(
            api_key,
            config.model.clone(),
            config.max_tokens,
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer `question` from `context`, falling back to the first sentence of
    /// the context on any API failure.
    pub async fn answer(&self, question: &str, context: &str) -> String {
        match self.complete(question, context).await {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("Answer generation failed, using fallback: {}", e);
                fallback_answer(context)
            }
        }
    }

    /// Single chat-completions request. Errors on network failure, non-2xx
    /// status, unparseable body, or an empty answer.
    pub async fn complete(&self, question: &str, context: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Context:\n{}\n\nQuestion: {}\nAnswer succinctly:",
                        context, question
                    ),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PubmedRagError::Llm(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(PubmedRagError::Llm(format!(
                "Chat API error {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| PubmedRagError::Llm(format!("Failed to parse response: {}", e)))?;

        let answer = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PubmedRagError::Llm("Empty response from chat API".to_string()))?;

        log::debug!("Chat API call took {:?}", start.elapsed());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_answerer() -> LlmAnswerer {
        // Port 1 on loopback refuses connections immediately
        LlmAnswerer::with_client_settings(
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            64,
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            Duration::from_secs(2),
        )
    }

    #[test]
    fn test_fallback_answer_first_sentence() {
        assert_eq!(
            fallback_answer("  Insulin lowers glucose. MRI detects changes."),
            "Insulin lowers glucose"
        );
        assert_eq!(fallback_answer("no period here"), "no period here");
        assert_eq!(fallback_answer(""), "");
        assert_eq!(fallback_answer(". leading period"), "");
    }

    #[test]
    fn test_from_config_disabled() {
        let config = LlmConfig {
            enabled: false,
            ..LlmConfig::default()
        };
        assert!(LlmAnswerer::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_missing_key() {
        let config = LlmConfig {
            api_key_env: "PUBMEDRAG_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        assert!(LlmAnswerer::from_config(&config).is_none());
    }

    #[test]
    fn test_with_client_settings_keeps_model() {
        let answerer = unreachable_answerer();
        assert_eq!(answerer.model(), "gpt-4o-mini");
        assert_eq!(answerer.max_tokens, 64);
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        let answerer = unreachable_answerer();
        let err = answerer.complete("q", "ctx").await.unwrap_err();
        assert!(matches!(err, PubmedRagError::Llm(_)));
    }

    #[tokio::test]
    async fn test_answer_falls_back_on_failure() {
        let answerer = unreachable_answerer();
        let answer = answerer
            .answer("what regulates glucose?", "Insulin regulates glucose. Other text.")
            .await;
        assert_eq!(answer, "Insulin regulates glucose");
    }
}
