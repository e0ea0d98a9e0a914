//! Chat messages over HTTP, for transports other than Telegram.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use magpie_core::{ChatUser, IncomingMessage};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// `None` when the text was not a command.
    pub reply: Option<String>,
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessageRequest>,
) -> Json<MessageResponse> {
    let mut user = ChatUser::new(request.user_id);
    user.username = request.username.filter(|name| !name.is_empty());

    debug!(user = %user.id, "Message via HTTP API");
    let reply = state
        .dispatcher()
        .handle(&IncomingMessage::new(user, request.text))
        .await;

    Json(MessageResponse { reply })
}
