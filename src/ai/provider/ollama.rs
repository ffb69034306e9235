//! Ollama Local LLM Provider
//!
//! LLM provider for locally-running Ollama models. Needs no API key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{
    ErrorClassifier, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    TokenUsage, build_http_client, error_from_response,
};
use crate::types::{DocError, ErrorCategory, LlmError, Result};

const DEFAULT_API_BASE: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3:latest";
const PROVIDER: &str = "ollama";

/// Ollama Local LLM Provider
#[derive(Debug)]
pub struct OllamaProvider {
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let api_base = Self::validate_endpoint(&api_base)?;

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_base,
            model,
            temperature: config.temperature,
            client: build_http_client(config.timeout_secs)?,
        })
    }

    /// Only http/https endpoints are accepted; non-local hosts are logged.
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            DocError::Config(format!("Invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DocError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
        {
            warn!(
                "Ollama endpoint is not localhost: {}. Ensure this is intentional.",
                host
            );
        }

        Ok(url.to_string().trim_end_matches('/').to_string())
    }

    fn build_request(&self, prompt: &str) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse> {
        info!(
            "Generating with Ollama (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let url = format!("{}/api/generate", self.api_base);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::with_provider(
                        ErrorCategory::Network,
                        format!(
                            "Failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                            self.api_base
                        ),
                        PROVIDER,
                    )
                } else {
                    ErrorClassifier::classify_transport(&e, PROVIDER)
                }
            })?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            return Err(error_from_response(response, PROVIDER).await);
        }

        let body: OllamaResponse = response.json().await.map_err(|e| {
            LlmError::with_provider(
                ErrorCategory::ParseError,
                format!("Failed to parse Ollama response: {}", e),
                PROVIDER,
            )
        })?;

        let usage = TokenUsage::new(
            body.prompt_eval_count.unwrap_or(0),
            body.eval_count.unwrap_or(0),
        );

        debug!("Received {} chars from Ollama", body.response.len());

        Ok(LlmResponse {
            content: body.response,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: PROVIDER.to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_config() {
        let config = ProviderConfig {
            provider: PROVIDER.to_string(),
            ..Default::default()
        };

        let provider = OllamaProvider::new(config).expect("Failed to create provider");
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = ProviderConfig {
            provider: PROVIDER.to_string(),
            api_base: Some("file:///etc/passwd".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            OllamaProvider::new(config),
            Err(DocError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_non_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"stream": false, "model": "llama3:latest"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "What is light?",
                "prompt_eval_count": 30,
                "eval_count": 5
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(ProviderConfig {
            provider: PROVIDER.to_string(),
            model: None,
            api_base: Some(server.uri()),
            ..Default::default()
        })
        .unwrap();

        let response = provider.generate("ask").await.unwrap();
        assert_eq!(response.content, "What is light?");
        assert_eq!(response.usage.total(), 35);
    }
}
