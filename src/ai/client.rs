//! HTTP client for the DashScope text-generation endpoint
//!
//! A single-attempt POST with bearer authorization. Every failure mode is
//! folded into an explicit [`GenerationOutcome::Unavailable`] value so the
//! caller's fallback substitution is a visible branch, never a null check.
//! No retries; timeout policy is whatever the transport enforces by default.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::AiConfig;
use crate::models::dashscope::{GenerationRequest, GenerationResponse};

/// Outcome of a single text-generation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The model returned non-empty text
    Generated(String),
    /// The call failed; the caller must substitute fallback output
    Unavailable(UnavailableReason),
}

/// Why a generation attempt produced no usable text
#[derive(Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    /// Network or transport error before a response was received
    Transport(String),
    /// The endpoint answered with a non-200 status
    Status(u16),
    /// The response body was not a parseable envelope
    MalformedEnvelope,
    /// The envelope parsed but carried no output text
    EmptyOutput,
    /// No API key is configured, so no call was attempted
    NotConfigured,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::MalformedEnvelope => write!(f, "malformed response envelope"),
            Self::EmptyOutput => write!(f, "empty output text"),
            Self::NotConfigured => write!(f, "no API key configured"),
        }
    }
}

/// A text-generation backend. The production implementation is
/// [`QwenClient`]; tests substitute stubs to force either path.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationOutcome;
}

/// DashScope (通义千问) client
pub struct QwenClient {
    client: Client,
    config: AiConfig,
}

impl QwenClient {
    /// Create a new client from the AI configuration.
    ///
    /// No request timeout is set here on purpose: callers must not assume a
    /// bounded wait beyond the transport's defaults.
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("TripAI/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for QwenClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No API key configured, skipping model call");
            return GenerationOutcome::Unavailable(UnavailableReason::NotConfigured);
        };

        info!("Calling text-generation endpoint, prompt length: {}", prompt.len());

        let request = GenerationRequest::new(self.config.model.clone(), prompt);

        let response = match self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Transport error calling text-generation endpoint: {e}");
                return GenerationOutcome::Unavailable(UnavailableReason::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Text-generation endpoint returned status {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            );
            return GenerationOutcome::Unavailable(UnavailableReason::Status(status.as_u16()));
        }

        let envelope: GenerationResponse = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Failed to parse generation response envelope: {e}");
                return GenerationOutcome::Unavailable(UnavailableReason::MalformedEnvelope);
            }
        };

        match envelope.output.and_then(|output| output.text) {
            Some(text) if !text.trim().is_empty() => {
                info!(
                    "Model responded, length: {}, request_id: {}",
                    text.len(),
                    envelope.request_id.as_deref().unwrap_or("-")
                );
                GenerationOutcome::Generated(text)
            }
            _ => {
                warn!("Generation response carried no output text");
                GenerationOutcome::Unavailable(UnavailableReason::EmptyOutput)
            }
        }
    }
}
