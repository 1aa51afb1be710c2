//! Remote reply source - asks an HTTP proxy for the coach reply.
//!
//! Secrets stay on the proxy; this client only sends the user text and a small
//! context object, and expects `{"reply": "..."}` back.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ReplyError;

/// Connection settings for the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Full URL of the chat endpoint.
    pub endpoint: String,

    /// Sent to the proxy so it can answer in demo tone.
    #[serde(default = "default_demo_mode")]
    pub demo_mode: bool,

    /// Per-request HTTP timeout in milliseconds.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_demo_mode() -> bool {
    true
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            demo_mode: true,
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    user_text: &'a str,
    context: RequestContext<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestContext<'a> {
    brand: &'a str,
    demo_mode: bool,
}

#[derive(Debug, Deserialize)]
struct ReplyResponse {
    reply: Option<String>,
}

/// HTTP-backed implementation of the reply contract.
#[derive(Debug, Clone)]
pub struct RemoteReplySource {
    client: Client,
    config: RemoteConfig,
    brand: String,
}

impl RemoteReplySource {
    pub fn new(config: RemoteConfig, brand: impl Into<String>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        Ok(Self::with_client(builder.build()?, config, brand))
    }

    /// Use an already configured HTTP client.
    pub fn with_client(client: Client, config: RemoteConfig, brand: impl Into<String>) -> Self {
        Self {
            client,
            config,
            brand: brand.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub(crate) async fn request_reply(&self, utterance: &str) -> Result<String, ReplyError> {
        let request = ReplyRequest {
            user_text: utterance,
            context: RequestContext {
                brand: &self.brand,
                demo_mode: self.config.demo_mode,
            },
        };

        tracing::debug!(endpoint = %self.config.endpoint, "Requesting remote reply");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| match self.config.request_timeout_ms {
                Some(ms) if e.is_timeout() => ReplyError::Timeout(Duration::from_millis(ms)),
                _ => ReplyError::Transport(e.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Proxy rejected reply request");
            return Err(ReplyError::Remote {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReplyError::Transport(format!("Failed to read response: {e}")))?;

        // The body can be a whole HTML page; it goes to the log, not into the error.
        let parsed: ReplyResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(body = %body, "Unparseable proxy response");
            ReplyError::Malformed(e.to_string())
        })?;

        match parsed.reply {
            Some(reply) if !reply.trim().is_empty() => Ok(reply),
            _ => Err(ReplyError::Malformed("response has no reply text".to_string())),
        }
    }
}
