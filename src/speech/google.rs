// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Google Cloud Text-to-Speech client
//!
//! Uses a configured bearer token when present, otherwise asks the
//! instance metadata server for one.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::SpeechSynthesizer;
use crate::config::SpeechConfig;
use crate::error::{ApiError, Result};
use crate::llm::providers::common::{error_for_status, send_error};

const SERVICE: &str = "Speech backend";

pub struct GoogleSpeechSynthesizer {
    client: Client,
    config: SpeechConfig,
    static_token: Option<String>,
    project_id: Option<String>,
}

impl GoogleSpeechSynthesizer {
    pub fn new(
        config: SpeechConfig,
        static_token: Option<String>,
        project_id: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            static_token,
            project_id,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text:synthesize",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        let response = self
            .client
            .get(&self.config.metadata_token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| send_error("Metadata server", e))?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.without_url().to_string()))?;
        Ok(token.access_token)
    }

    fn build_request<'a>(&'a self, text: &'a str) -> SynthesizeRequest<'a> {
        SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.config.language_code,
                name: &self.config.voice_name,
                ssml_gender: &self.config.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: &self.config.audio_encoding,
                pitch: self.config.pitch,
                speaking_rate: self.config.speaking_rate,
                effects_profile_id: &self.config.effects_profile_ids,
            },
        }
    }

    async fn request_audio(&self, text: &str) -> Result<Vec<u8>> {
        let token = self.access_token().await?;

        let mut request = self
            .client
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&self.build_request(text));
        if let Some(project) = &self.project_id {
            request = request.header("x-goog-user-project", project);
        }

        let response = request.send().await.map_err(|e| send_error(SERVICE, e))?;
        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.without_url().to_string()))?;

        let encoded = body
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("no audioContent in response".to_string()))?;

        Ok(STANDARD
            .decode(encoded)
            .map_err(|e| ApiError::InvalidResponse(format!("audioContent is not base64: {}", e)))?)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match self.request_audio(text).await {
            Ok(audio) => {
                tracing::debug!(bytes = audio.len(), "speech synthesized");
                Some(audio)
            }
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed; replying without audio");
                None
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
    pitch: f32,
    speaking_rate: f32,
    effects_profile_id: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}
