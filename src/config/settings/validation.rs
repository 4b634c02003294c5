// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::error::{DailyWordError, Result};

use super::Settings;

impl Settings {
    /// Get the generative API key, checking env var first.
    pub fn get_genai_api_key(&self) -> Option<String> {
        // Priority: env var > config file.
        std::env::var(&self.genai.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.genai.api_key.clone())
    }

    /// Model used for scripture generation (`GENAI_MODEL` overrides config).
    pub fn generation_model(&self) -> String {
        std::env::var("GENAI_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.genai.model.clone())
    }

    /// Model used for chat replies.
    pub fn chat_model(&self) -> String {
        self.genai
            .chat_model
            .clone()
            .unwrap_or_else(|| self.generation_model())
    }

    /// Get the speech bearer token, checking env var first.
    pub fn get_speech_access_token(&self) -> Option<String> {
        std::env::var(&self.speech.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.speech.access_token.clone())
    }

    /// Billing project for speech requests (`GCLOUD_PROJECT` fallback).
    pub fn speech_project_id(&self) -> Option<String> {
        self.speech
            .project_id
            .clone()
            .or_else(|| std::env::var("GCLOUD_PROJECT").ok())
    }

    /// Timezone defining "today" (`SCRIPTURE_TIMEZONE` overrides config).
    pub fn scripture_timezone(&self) -> Result<Tz> {
        let name = std::env::var("SCRIPTURE_TIMEZONE")
            .ok()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| self.scripture.timezone.clone());
        parse_timezone(&name)
    }

    /// Wall-clock time of the daily trigger.
    pub fn schedule_time(&self) -> Result<NaiveTime> {
        parse_schedule_time(&self.schedule.time)
    }

    /// Check the settings for values that would only fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        self.scripture_timezone()?;
        self.schedule_time()?;

        for (name, value) in [
            ("genai.generation_temperature", self.genai.generation_temperature),
            ("genai.chat_temperature", self.genai.chat_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(DailyWordError::Config(format!(
                    "{} must be between 0.0 and 2.0, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.resilience.jitter) {
            return Err(DailyWordError::Config(format!(
                "resilience.jitter must be between 0.0 and 1.0, got {}",
                self.resilience.jitter
            )));
        }

        if self.scripture.default_theme.trim().is_empty() {
            return Err(DailyWordError::Config(
                "scripture.default_theme must not be empty".to_string(),
            ));
        }

        if self.genai.timeout_secs == 0 {
            return Err(DailyWordError::Config(
                "genai.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| DailyWordError::Config(format!("Invalid timezone: {}", value.trim())))
}

fn parse_schedule_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        DailyWordError::Config(format!(
            "Invalid schedule time '{}', expected HH:MM",
            value.trim()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/Denver").unwrap(), Tz::America__Denver);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_parse_schedule_time() {
        assert_eq!(
            parse_schedule_time("05:30").unwrap(),
            NaiveTime::from_hms_opt(5, 30, 0).unwrap()
        );
        assert!(parse_schedule_time("25:00").is_err());
        assert!(parse_schedule_time("midnight").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut settings = Settings::default();
        settings.genai.generation_temperature = 3.5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("generation_temperature"));
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let mut settings = Settings::default();
        settings.schedule.time = "noon".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_default_theme() {
        let mut settings = Settings::default();
        settings.scripture.default_theme = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_api_key_from_config_when_env_missing() {
        let mut settings = Settings::default();
        settings.genai.api_key_env = "DAILY_WORD_TEST_UNSET_KEY_9431".to_string();
        settings.genai.api_key = Some("config-key".to_string());
        assert_eq!(settings.get_genai_api_key(), Some("config-key".to_string()));
    }

    #[test]
    fn test_chat_model_falls_back() {
        let mut settings = Settings::default();
        settings.genai.chat_model = Some("gemini-2.0-flash".to_string());
        assert_eq!(settings.chat_model(), "gemini-2.0-flash");
    }
}
