// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::error::{HttpError, CHAT_FAILED, SCRIPTURE_UNAVAILABLE};
use super::SharedState;
use crate::chat::{ChatTurn, TranscriptEntry};
use crate::error::DailyWordError;
use crate::scripture::Scripture;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /scripture/today
pub async fn today_scripture(
    State(state): State<SharedState>,
) -> Result<Json<Scripture>, HttpError> {
    state.resolver.resolve_today().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "failed to resolve today's scripture");
        HttpError::internal(SCRIPTURE_UNAVAILABLE)
    })
}

/// Scripture the user is asking about
#[derive(Debug, Default, Deserialize)]
pub struct ScriptureContext {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /chat body
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub scripture: Option<ScriptureContext>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<TranscriptEntry>,
}

impl From<ChatRequest> for ChatTurn {
    fn from(request: ChatRequest) -> Self {
        let scripture = request.scripture.unwrap_or_default();
        ChatTurn {
            theme: request.theme.unwrap_or_default(),
            scripture_reference: scripture.reference.unwrap_or_default(),
            scripture_text: scripture.text.unwrap_or_default(),
            user_message: request.message.unwrap_or_default(),
            history: request.history,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Base64-encoded audio clip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// POST /chat
pub async fn chat(
    State(state): State<SharedState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, HttpError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected chat body");
        HttpError::bad_request("Invalid JSON in request body")
    })?;

    match state.relay.respond(request.into()).await {
        Ok(reply) => Ok(Json(ChatResponse {
            reply: reply.reply_text,
            audio: reply.audio.map(|bytes| STANDARD.encode(bytes)),
        })),
        Err(DailyWordError::InvalidInput(message)) => Err(HttpError::bad_request(message)),
        Err(e) => {
            tracing::error!(error = %e, "chat relay failed");
            Err(HttpError::internal(CHAT_FAILED))
        }
    }
}

/// Any method other than the route's own
pub async fn method_not_allowed() -> HttpError {
    HttpError::method_not_allowed()
}

/// Unknown path
pub async fn not_found() -> HttpError {
    HttpError::not_found()
}
