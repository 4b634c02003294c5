// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use super::{ChatTurn, Speaker};

/// Render the system instruction, prior turns and the new message
pub fn chat_prompt(congregation: &str, theme: &str, turn: &ChatTurn) -> String {
    let mut prompt = format!(
        "You are a friendly and knowledgeable biblical assistant for the '{congregation}' church. \
         The theme is \"{theme}\". The scripture is {reference} which reads: \"{text}\". \
         Respond to the user's message in a concise, uplifting, and conversational style. \
         Keep responses appropriate for a church audience.",
        reference = turn.scripture_reference.trim(),
        text = turn.scripture_text.trim(),
    );

    for entry in &turn.history {
        let speaker = match entry.source {
            Speaker::User => "User",
            Speaker::Model => "Assistant",
        };
        prompt.push_str(&format!("\n{}: {}", speaker, entry.text.trim()));
    }

    prompt.push_str(&format!("\nUser: {}\nAssistant:", turn.user_message.trim()));
    prompt
}
