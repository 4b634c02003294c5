// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use daily_word::config::{Settings, StorageBackend};
use tempfile::TempDir;

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.genai.model, "gemini-2.5-flash");
    assert!((settings.genai.chat_temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(settings.scripture.default_theme, "Encouragement");
    assert_eq!(settings.storage.backend, StorageBackend::File);
    assert!(settings.schedule.enabled);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_api_key_priority() {
    // Use a custom env var name to avoid test pollution
    let mut settings = Settings::default();
    settings.genai.api_key_env = "DAILY_WORD_TEST_API_KEY_12345".to_string();
    settings.genai.api_key = Some("config-key".to_string());

    // Without env var, should use config key
    std::env::remove_var("DAILY_WORD_TEST_API_KEY_12345");
    assert_eq!(settings.get_genai_api_key(), Some("config-key".to_string()));

    // With env var set, should prefer env var
    std::env::set_var("DAILY_WORD_TEST_API_KEY_12345", "env-key");
    assert_eq!(settings.get_genai_api_key(), Some("env-key".to_string()));

    std::env::remove_var("DAILY_WORD_TEST_API_KEY_12345");
}

#[test]
fn test_chat_model_falls_back_to_generation_model() {
    let mut settings = Settings::default();
    settings.genai.model = "gemini-test".to_string();
    if std::env::var("GENAI_MODEL").is_err() {
        assert_eq!(settings.chat_model(), "gemini-test");
    }

    settings.genai.chat_model = Some("gemini-chat".to_string());
    assert_eq!(settings.chat_model(), "gemini-chat");
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut settings = Settings::default();
    settings.schedule.time = "25:00".to_string();
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.genai.generation_temperature = 2.5;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.scripture.default_theme = "   ".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[scripture]
default_theme = "Grace"
exclusive_daily_write = false

[storage]
backend = "memory"

[schedule]
time = "05:30"
"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.scripture.default_theme, "Grace");
    assert!(!settings.scripture.exclusive_daily_write);
    assert_eq!(settings.storage.backend, StorageBackend::Memory);
    assert_eq!(
        settings.schedule_time().unwrap(),
        chrono::NaiveTime::from_hms_opt(5, 30, 0).unwrap()
    );
    // Untouched sections keep their defaults
    assert_eq!(settings.speech.voice_name, "en-US-Neural2-F");
}

#[test]
fn test_settings_save_preserves_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    std::fs::write(&path, r#"{"custom": {"note": "keep me"}}"#).unwrap();

    let mut settings = Settings::load_from(&path).unwrap();
    settings.scripture.congregation = "Grace Chapel".to_string();
    settings.save_to(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["custom"]["note"], "keep me");
    assert_eq!(raw["scripture"]["congregation"], "Grace Chapel");
}

#[test]
fn test_settings_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Settings::load_from(&path).is_err());
}
