//! Retell HTTP client. Thin wrapper over `POST /create-agent`; response
//! handling lives in [`parse_response`] for testability.

use async_trait::async_trait;

use super::{AgentRequest, VoiceAgent, VoiceError};
use crate::config::HttpTimeouts;

pub struct RetellClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RetellClient {
    /// # Errors
    ///
    /// Returns [`VoiceError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: &str, timeouts: HttpTimeouts) -> Result<Self, VoiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| VoiceError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url: base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn create_agent_url(&self) -> String {
        format!("{}/create-agent", self.base_url)
    }
}

#[async_trait]
impl VoiceAgent for RetellClient {
    async fn create_agent(&self, request: &AgentRequest) -> Result<serde_json::Value, VoiceError> {
        let response = self
            .http
            .post(self.create_agent_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| VoiceError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| VoiceError::Request(e.to_string()))?;

        parse_response(status, &text)
    }
}

/// Interpret a create-agent reply.
///
/// # Errors
///
/// Non-2xx statuses become [`VoiceError::Api`]; bodies that are not JSON
/// become [`VoiceError::Response`].
pub fn parse_response(status: u16, body: &str) -> Result<serde_json::Value, VoiceError> {
    if !(200..300).contains(&status) {
        return Err(VoiceError::Api { status, body: body.to_string() });
    }
    serde_json::from_str(body).map_err(|e| VoiceError::Response(e.to_string()))
}

#[cfg(test)]
#[path = "retell_test.rs"]
mod tests;
