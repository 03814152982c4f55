//! Completion provider boundary
//!
//! The gateway talks to the external generative-text provider through the
//! [`CompletionProvider`] trait; [`HttpCompletionProvider`] is the HTTP
//! implementation. Any non-success response or malformed payload is a
//! provider error, which the gateway treats as transient.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{GatewayError, ProviderError};

/// Model parameters sent with every completion request
#[derive(Debug, Clone, Serialize)]
pub struct ModelParameters {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ModelParameters {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// External generative-text provider seam
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request a single text completion for the framed prompt.
    async fn complete(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    completion: String,
}

/// HTTP transport to the configured provider endpoint
pub struct HttpCompletionProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCompletionProvider {
    /// Build the client from configuration. The credential is read from
    /// the configured environment variable; it never lives in config files.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, GatewayError> {
        if config.endpoint.is_empty() {
            return Err(GatewayError::Configuration(
                "provider endpoint must be set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("llm-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Configuration(format!("http client build failed: {}", e)))?;

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                var = %config.api_key_env,
                "provider credential variable not set, sending unauthenticated requests"
            );
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            model: &params.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let payload: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(payload.completion)
    }
}
