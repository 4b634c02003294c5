// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Conversational assistant about the day's scripture
//!
//! The relay is stateless. Callers that want continuity send earlier turns
//! back as `history`, which is replayed into the prompt transcript.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{DailyWordError, Result};
use crate::llm::TextGenerator;
use crate::speech::SpeechSynthesizer;

pub mod prompt;

/// Who spoke a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    #[serde(alias = "assistant")]
    Model,
}

/// One earlier turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub source: Speaker,
    pub text: String,
}

/// A user message about a scripture
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub theme: String,
    pub scripture_reference: String,
    pub scripture_text: String,
    pub user_message: String,
    pub history: Vec<TranscriptEntry>,
}

/// The assistant's answer, voiced when speech is available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply_text: String,
    pub audio: Option<Vec<u8>>,
}

pub struct ChatRelay {
    text: TextGenerator,
    speech: Arc<dyn SpeechSynthesizer>,
    temperature: f32,
    default_theme: String,
    congregation: String,
}

impl ChatRelay {
    pub fn new(text: TextGenerator, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            text,
            speech,
            temperature: 0.7,
            default_theme: "Encouragement".to_string(),
            congregation: "the congregation".to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    pub fn with_congregation(mut self, congregation: impl Into<String>) -> Self {
        self.congregation = congregation.into();
        self
    }

    /// Answer one user message.
    ///
    /// A blank message is rejected before any backend call. Backend
    /// failures and empty replies propagate; speech failures only drop the
    /// audio.
    pub async fn respond(&self, turn: ChatTurn) -> Result<ChatReply> {
        if turn.user_message.trim().is_empty() {
            return Err(DailyWordError::InvalidInput(
                "Missing message in request body".to_string(),
            ));
        }

        let theme = match turn.theme.trim() {
            "" => self.default_theme.as_str(),
            theme => theme,
        };
        let prompt = prompt::chat_prompt(&self.congregation, theme, &turn);

        tracing::debug!(
            theme,
            reference = %turn.scripture_reference,
            history = turn.history.len(),
            "relaying chat message"
        );

        let reply_text = self.text.generate_text(&prompt, self.temperature).await?;
        let audio = self.speech.synthesize(&reply_text).await;

        Ok(ChatReply { reply_text, audio })
    }
}
