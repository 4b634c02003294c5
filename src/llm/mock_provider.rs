// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock LLM provider for testing
//!
//! Provides a configurable mock implementation of the LlmProvider trait
//! that can be used in tests without making real API calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{ApiError, Result};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};

/// A mock LLM provider for testing
#[derive(Clone)]
pub struct MockProvider {
    /// Provider name
    name: String,
    /// Configured responses
    responses: Arc<Mutex<Vec<MockResponse>>>,
    /// Call counter
    call_count: Arc<AtomicUsize>,
    /// Recorded requests
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A pre-configured outcome for the mock provider
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this text
    Text(String),
    /// Fail with an upstream HTTP error
    HttpError { status: u16, body: String },
    /// Fail with a network error
    NetworkError(String),
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Mock provider lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: Arc::new(Mutex::new(vec![MockResponse::default()])),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Create a mock provider with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut provider = Self::new();
        provider.name = name.into();
        provider
    }

    /// Set the text response
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.with_outcomes(vec![MockResponse::Text(text.into())])
    }

    /// Queue multiple text responses (returned in order, the last repeats)
    pub fn with_responses(self, texts: Vec<String>) -> Self {
        self.with_outcomes(texts.into_iter().map(MockResponse::Text).collect())
    }

    /// Queue arbitrary outcomes (returned in order, the last repeats)
    pub fn with_outcomes(self, outcomes: Vec<MockResponse>) -> Self {
        {
            let mut responses = lock(&self.responses);
            responses.clear();
            responses.extend(outcomes);
        }
        self
    }

    /// Fail every call with the given HTTP status
    pub fn with_http_error(self, status: u16, body: impl Into<String>) -> Self {
        self.with_outcomes(vec![MockResponse::HttpError {
            status,
            body: body.into(),
        }])
    }

    /// Get the number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        lock(&self.recorded_requests).clone()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.recorded_requests).last().cloned()
    }

    /// Reset call count and recorded requests
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        lock(&self.recorded_requests).clear();
    }

    /// Get the next response
    fn next_response(&self) -> MockResponse {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let responses = lock(&self.responses);
        if responses.is_empty() {
            MockResponse::default()
        } else {
            responses[count.min(responses.len() - 1)].clone()
        }
    }
}

impl Default for MockResponse {
    fn default() -> Self {
        MockResponse::Text("Mock response".to_string())
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        lock(&self.recorded_requests).push(request.clone());

        match self.next_response() {
            MockResponse::Text(text) => Ok(CompletionResponse {
                model: request.model,
                usage: Usage {
                    input_tokens: (request.prompt.len() / 4) as u32,
                    output_tokens: (text.len() / 4) as u32,
                },
                text,
                finish_reason: Some("STOP".to_string()),
            }),
            MockResponse::HttpError { status, body } => {
                Err(ApiError::UpstreamHttp { status, body }.into())
            }
            MockResponse::NetworkError(message) => Err(ApiError::Network(message).into()),
        }
    }
}
