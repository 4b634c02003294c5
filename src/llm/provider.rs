// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM Provider trait and related types
//!
//! Defines the abstraction layer for generative text backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Main trait for generative text backends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Single-turn, non-streaming completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Request for completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model to use
    pub model: String,

    /// Full prompt text
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Model used
    pub model: String,

    /// Concatenated response text, trimmed
    pub text: String,

    /// Why the model stopped generating, as reported by the backend
    pub finish_reason: Option<String>,

    /// Token usage
    pub usage: Usage,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens
    pub input_tokens: u32,
    /// Output tokens
    pub output_tokens: u32,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: 0.7,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Usage {
    /// Get total tokens used
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Generative client bound to one model.
///
/// Wraps a provider with the model name so callers only supply a prompt
/// and a temperature.
#[derive(Clone)]
pub struct TextGenerator {
    provider: std::sync::Arc<dyn LlmProvider>,
    model: String,
}

impl TextGenerator {
    pub fn new(provider: std::sync::Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Generate text for a prompt. Blank output is an `EmptyResponse` error.
    pub async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request =
            CompletionRequest::new(self.model.clone(), prompt).with_temperature(temperature);
        let response = self.provider.complete(request).await?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            total_tokens = response.usage.total_tokens(),
            "completion finished"
        );

        let text = response.text.trim();
        if text.is_empty() {
            return Err(ApiError::EmptyResponse.into());
        }
        Ok(text.to_string())
    }
}
