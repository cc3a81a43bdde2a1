//! Voice agent: hosted conversational agent behind the dashboard's chat
//! button.
//!
//! DESIGN
//! ======
//! The dashboard only needs to provision an agent for a configured
//! conversation flow; the live audio session runs between the browser and
//! the provider. `VoiceAgent` is the seam routes depend on so tests can
//! swap in a mock.

pub mod retell;

use serde::Serialize;

pub use retell::RetellClient;

pub const AGENT_NAME: &str = "Auro Voice Agent";
pub const DEFAULT_VOICE_ID: &str = "11labs-Adrian";

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    #[error("voice agent request failed: {0}")]
    Request(String),
    #[error("voice agent API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("invalid voice agent response: {0}")]
    Response(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEngine {
    pub llm_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Body of the provider's create-agent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRequest {
    pub response_engine: ResponseEngine,
    pub agent_name: String,
    pub voice_id: String,
}

impl AgentRequest {
    /// Agent answering through the given conversation flow (provider LLM id).
    #[must_use]
    pub fn for_conversation_flow(conversation_flow_id: &str) -> Self {
        Self {
            response_engine: ResponseEngine { llm_id: conversation_flow_id.to_string(), kind: "retell-llm".into() },
            agent_name: AGENT_NAME.into(),
            voice_id: DEFAULT_VOICE_ID.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait VoiceAgent: Send + Sync {
    /// Provision an agent and return the provider's description of it.
    ///
    /// # Errors
    ///
    /// Returns a [`VoiceError`] on transport failure or a non-success reply.
    async fn create_agent(&self, request: &AgentRequest) -> Result<serde_json::Value, VoiceError>;
}
