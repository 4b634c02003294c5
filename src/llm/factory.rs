// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Provider factory for creating generative clients
//!
//! Centralizes provider creation so the server and CLI build the backend
//! from settings the same way.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{DailyWordError, Result};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};
use crate::llm::providers::GeminiProvider;

/// Factory for creating LLM providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the generative provider, failing if credentials are missing
    pub fn create(settings: &Settings) -> Result<Arc<dyn LlmProvider>> {
        let api_key = settings
            .get_genai_api_key()
            .ok_or_else(|| DailyWordError::NotConfigured(missing_key_message(settings)))?;

        let provider = GeminiProvider::with_base_url(
            api_key,
            &settings.genai.base_url,
            Duration::from_secs(settings.genai.timeout_secs),
        )?;

        Ok(Arc::new(provider))
    }

    /// Create the generative provider for a long-running service.
    ///
    /// Missing credentials are logged and produce a provider that fails
    /// every call with `NotConfigured`, so the service still starts and
    /// reports the problem to each caller until it is fixed.
    pub fn create_or_unconfigured(settings: &Settings) -> Result<Arc<dyn LlmProvider>> {
        match Self::create(settings) {
            Ok(provider) => Ok(provider),
            Err(DailyWordError::NotConfigured(message)) => {
                tracing::error!(%message, "generative backend is not configured");
                Ok(Arc::new(UnconfiguredProvider { message }))
            }
            Err(other) => Err(other),
        }
    }
}

fn missing_key_message(settings: &Settings) -> String {
    format!(
        "No generative API key found. \
         Set the {} environment variable or genai.api_key in settings.",
        settings.genai.api_key_env
    )
}

/// Stand-in provider used when credentials are missing
pub struct UnconfiguredProvider {
    message: String,
}

#[async_trait]
impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        Err(DailyWordError::NotConfigured(self.message.clone()))
    }
}
