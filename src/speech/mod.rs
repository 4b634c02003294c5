// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Speech synthesis for chat replies
//!
//! Synthesis is best-effort: implementations log failures and return
//! `None` rather than an error, so a reply is never lost to a voice
//! backend outage.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;

pub mod google;

pub use google::GoogleSpeechSynthesizer;

/// Turns reply text into an audio clip
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Audio bytes for `text`, or `None` if synthesis is unavailable
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>>;
}

/// Synthesizer used when speech is turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSynthesizer;

#[async_trait]
impl SpeechSynthesizer for DisabledSynthesizer {
    async fn synthesize(&self, _text: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Build the configured synthesizer
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn SpeechSynthesizer>> {
    if !settings.speech.enabled {
        tracing::info!("speech synthesis disabled");
        return Ok(Arc::new(DisabledSynthesizer));
    }

    Ok(Arc::new(GoogleSpeechSynthesizer::new(
        settings.speech.clone(),
        settings.get_speech_access_token(),
        settings.speech_project_id(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_synthesizer_never_returns_audio() {
        assert!(DisabledSynthesizer.synthesize("Amen").await.is_none());
    }

    #[tokio::test]
    async fn test_from_settings_respects_enabled_flag() {
        let mut settings = Settings::default();
        settings.speech.enabled = false;
        let synthesizer = from_settings(&settings).unwrap();
        assert!(synthesizer.synthesize("Amen").await.is_none());
    }
}
