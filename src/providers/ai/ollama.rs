//! Ollama text-generation backend.
//!
//! Talks to Ollama's native generate endpoint (`/api/generate`) with a
//! non-streaming request: `{model, prompt, stream: false}` in, a single
//! `{response}` free-text field out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{CompletionRequest, CompletionResponse, LlmError, LlmResult, TextGenerator};

/// Default Ollama server URL.
const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default local model.
const DEFAULT_MODEL: &str = "llama3.2";

/// Ollama generate request body.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

/// Ollama sampling options.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<usize>,
}

/// Ollama generate response body.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama error response body.
#[derive(Debug, Deserialize)]
struct GenerateErrorResponse {
    error: String,
}

/// Text generator backed by a local or remote Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Creates a generator against the default localhost server.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_url(OLLAMA_DEFAULT_URL, model)
    }

    /// Creates a generator against a custom server URL.
    pub fn with_url(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Creates a generator with the default llama3.2 model.
    pub fn llama3() -> Self {
        Self::new(DEFAULT_MODEL)
    }

    /// Overrides the HTTP client (useful for custom timeouts or proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> GenerateRequest<'a> {
        let options = match (request.temperature, request.max_tokens) {
            (None, None) => None,
            (temperature, num_predict) => Some(GenerateOptions {
                temperature,
                num_predict,
            }),
        };

        GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            stream: false,
            options,
        }
    }

    async fn handle_error_response(&self, response: reqwest::Response) -> LlmError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());

            return LlmError::RateLimited {
                retry_after_secs: retry_after,
            };
        }

        if let Ok(error) = response.json::<GenerateErrorResponse>().await {
            if status == 401 {
                return LlmError::Authentication(error.error);
            }
            return LlmError::Api {
                status,
                message: error.error,
            };
        }

        LlmError::Api {
            status,
            message: format!("HTTP {}", status),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> LlmResult<CompletionResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let body = self.build_request(request);

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let api_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {}", e)))?;

        Ok(CompletionResponse {
            text: api_response.response,
        })
    }
}
