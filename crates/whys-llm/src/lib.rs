//! # whys-llm
//!
//! OpenAI-compatible chat completion client (Groq by default) that serves as
//! the engine's [`Generator`].
//!
//! Every generation request becomes one `POST {base_url}/chat/completions`.
//! Root-cause requests additionally ask for a JSON object response. This
//! client never retries; duplicate handling lives in the engine.

mod chat;
mod error;
mod http;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, build_request, first_content};
pub use error::LlmError;

use std::time::Duration;

use whys_config::LlmConfig;
use whys_engine::{GenerationError, GenerationRequest, Generator};

use crate::http::check_response;

/// Chat completion client.
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    top_p: f32,
}

impl LlmClient {
    /// Build a client from the `[llm]` config section.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::NotConfigured` without an API key, or
    /// `LlmError::Http` if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.is_configured() {
            return Err(LlmError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("whys/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat completion and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, non-success status, or an
    /// unreadable response.
    pub async fn complete(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = build_request(&self.model, self.temperature, self.top_p, request);
        let started = std::time::Instant::now();
        let resp = check_response(
            self.http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?,
        )
        .await?;
        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        let content = first_content(parsed)?;
        tracing::debug!(
            model = %self.model,
            purpose = ?request.purpose,
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "llm: completion received"
        );
        Ok(content)
    }
}

impl Generator for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.complete(request).await.map_err(|e| {
            tracing::warn!(error = %e, "llm: generation failed");
            GenerationError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> LlmConfig {
        LlmConfig {
            api_key: api_key.into(),
            base_url: "http://localhost:9999/v1/".into(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn requires_api_key() {
        assert!(matches!(
            LlmClient::new(&config("")),
            Err(LlmError::NotConfigured)
        ));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = LlmClient::new(&config("gsk-test")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(client.model(), "openai/gpt-oss-20b");
    }

    #[test]
    fn errors_map_to_generation_errors() {
        let err = GenerationError::from(LlmError::RateLimited {
            retry_after_secs: 12,
        });
        assert!(matches!(err, GenerationError::RateLimited { retry_after_secs: 12 }));
        let err = GenerationError::from(LlmError::NotConfigured);
        assert!(matches!(err, GenerationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_error() {
        let client = LlmClient::new(&LlmConfig {
            api_key: "gsk-test".into(),
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..LlmConfig::default()
        })
        .unwrap();
        let request = GenerationRequest::root_cause("Analyze.".into());
        let err = client.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
