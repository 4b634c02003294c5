// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP surface
//!
//! - `GET /scripture/today` resolves the day's scripture
//! - `POST /chat` relays a message about it
//! - `GET /health` is a liveness probe

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use crate::chat::ChatRelay;
use crate::error::Result;
use crate::scripture::DailyResolver;

pub mod error;
pub mod routes;

pub use error::HttpError;

/// Services shared by every handler
pub struct AppState {
    pub resolver: Arc<DailyResolver>,
    pub relay: Arc<ChatRelay>,
}

pub type SharedState = Arc<AppState>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/scripture/today",
            get(routes::today_scripture).fallback(routes::method_not_allowed),
        )
        .route(
            "/chat",
            post(routes::chat).fallback(routes::method_not_allowed),
        )
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Caller-supplied request id, or a fresh one
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers())
    )
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn serve<F>(listener: TcpListener, state: SharedState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "daily word server listening");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("daily word server stopped");
    Ok(())
}
