//! Voice-agent routes behind the dashboard's call button.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::json;

use super::voice_error_to_status;
use crate::state::AppState;
use crate::voice::AgentRequest;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectBody {
    pub api_key: Option<String>,
    pub agent_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartConversationBody {
    pub agent_id: Option<String>,
    pub conversation_flow_id: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `POST /api/retell`: validates the client's credentials pair. The live
/// session is opened by the browser, so nothing is dialed here.
pub async fn connect(Json(body): Json<ConnectBody>) -> Result<Json<serde_json::Value>, StatusCode> {
    if present(body.api_key.as_deref()).is_none() || present(body.agent_id.as_deref()).is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({ "success": true })))
}

/// `POST /api/retell/start-conversation`: provision an agent for a
/// conversation flow.
pub async fn start_conversation(
    State(state): State<AppState>,
    Json(body): Json<StartConversationBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let (Some(agent_id), Some(flow_id)) =
        (present(body.agent_id.as_deref()), present(body.conversation_flow_id.as_deref()))
    else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let Some(voice) = state.voice.as_ref() else {
        tracing::warn!("voice agent requested but RETELL_API_KEY is not configured");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let request = AgentRequest::for_conversation_flow(flow_id);
    let data = voice.create_agent(&request).await.map_err(voice_error_to_status)?;
    tracing::info!(%agent_id, conversation_flow_id = %flow_id, "voice agent created");

    Ok(Json(json!({ "success": true, "data": data })))
}

#[cfg(test)]
#[path = "retell_test.rs"]
mod tests;
