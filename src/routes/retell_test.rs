use std::sync::{Arc, Mutex};

use super::*;
use crate::state::test_helpers::{test_app_state, test_app_state_with_voice};
use crate::voice::{VoiceAgent, VoiceError};

struct MockVoice {
    reply: Result<serde_json::Value, u16>,
    seen: Mutex<Vec<AgentRequest>>,
}

impl MockVoice {
    fn answering(reply: Result<serde_json::Value, u16>) -> Arc<Self> {
        Arc::new(Self { reply, seen: Mutex::new(Vec::new()) })
    }
}

#[async_trait::async_trait]
impl VoiceAgent for MockVoice {
    async fn create_agent(&self, request: &AgentRequest) -> Result<serde_json::Value, VoiceError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(value) => Ok(value.clone()),
            Err(status) => Err(VoiceError::Api { status: *status, body: "upstream says no".into() }),
        }
    }
}

fn start_body(agent: Option<&str>, flow: Option<&str>) -> Json<StartConversationBody> {
    Json(StartConversationBody { agent_id: agent.map(Into::into), conversation_flow_id: flow.map(Into::into) })
}

#[tokio::test]
async fn connect_requires_key_and_agent() {
    let ok = connect(Json(ConnectBody { api_key: Some("k".into()), agent_id: Some("a".into()) })).await.unwrap();
    assert_eq!(ok.0, json!({ "success": true }));

    let err = connect(Json(ConnectBody { api_key: Some(" ".into()), agent_id: Some("a".into()) })).await.unwrap_err();
    assert_eq!(err, StatusCode::BAD_REQUEST);
    assert_eq!(connect(Json(ConnectBody::default())).await.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[test]
fn bodies_use_camel_case_keys() {
    let body: StartConversationBody =
        serde_json::from_str(r#"{"agentId":"ag_1","conversationFlowId":"flow_9"}"#).unwrap();
    assert_eq!(body.agent_id.as_deref(), Some("ag_1"));
    assert_eq!(body.conversation_flow_id.as_deref(), Some("flow_9"));
}

#[tokio::test]
async fn start_conversation_creates_agent_for_flow() {
    let mock = MockVoice::answering(Ok(json!({ "agent_id": "agent_123" })));
    let state = test_app_state_with_voice(mock.clone());

    let Json(reply) = start_conversation(State(state), start_body(Some("ag_1"), Some("flow_9"))).await.unwrap();

    assert_eq!(reply["success"], true);
    assert_eq!(reply["data"]["agent_id"], "agent_123");
    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], AgentRequest::for_conversation_flow("flow_9"));
}

#[tokio::test]
async fn start_conversation_rejects_missing_ids() {
    let mock = MockVoice::answering(Ok(json!({})));
    let state = test_app_state_with_voice(mock.clone());

    let err = start_conversation(State(state), start_body(Some("ag_1"), None)).await.unwrap_err();
    assert_eq!(err, StatusCode::BAD_REQUEST);
    assert!(mock.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn start_conversation_without_api_key_is_unavailable() {
    let err = start_conversation(State(test_app_state()), start_body(Some("ag_1"), Some("flow_9")))
        .await
        .unwrap_err();
    assert_eq!(err, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn upstream_rejection_is_bad_gateway() {
    let state = test_app_state_with_voice(MockVoice::answering(Err(401)));
    let err = start_conversation(State(state), start_body(Some("ag_1"), Some("flow_9"))).await.unwrap_err();
    assert_eq!(err, StatusCode::BAD_GATEWAY);
}
