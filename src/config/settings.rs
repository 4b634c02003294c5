// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for daily-word
//!
//! Handles loading and saving settings from ~/.daily-word/settings.json
//! (or a TOML file when the path ends in `.toml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod io;
mod migration;
mod validation;

/// Main settings structure, stored in ~/.daily-word/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Generative text backend configuration
    #[serde(default)]
    pub genai: GenAiConfig,

    /// Speech synthesis backend configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Daily scripture behaviour
    #[serde(default)]
    pub scripture: ScriptureConfig,

    /// Retry settings for scripture generation
    #[serde(default)]
    pub resilience: ResilienceConfig,

    /// Daily trigger settings
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Durability layer settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Generative text backend (Gemini REST) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiConfig {
    /// API key (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for API key
    #[serde(default = "default_genai_api_key_env")]
    pub api_key_env: String,

    /// Model used for scripture generation
    #[serde(default = "default_genai_model")]
    pub model: String,

    /// Model used for chat replies (falls back to `model`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_model: Option<String>,

    /// Base URL for the API
    #[serde(default = "default_genai_base_url")]
    pub base_url: String,

    /// Sampling temperature for scripture generation
    #[serde(default = "default_temperature")]
    pub generation_temperature: f32,

    /// Sampling temperature for chat replies
    #[serde(default = "default_temperature")]
    pub chat_temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_genai_timeout_secs")]
    pub timeout_secs: u64,
}

/// Speech synthesis (Google Cloud Text-to-Speech) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Whether chat replies are voiced at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the text-to-speech API
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,

    /// Static bearer token (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Environment variable holding a bearer token
    #[serde(default = "default_speech_token_env")]
    pub access_token_env: String,

    /// Metadata server URL used when no token is configured
    #[serde(default = "default_metadata_token_url")]
    pub metadata_token_url: String,

    /// Billing project sent as `x-goog-user-project`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// BCP-47 language code
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Voice name
    #[serde(default = "default_voice_name")]
    pub voice_name: String,

    /// SSML gender of the voice
    #[serde(default = "default_ssml_gender")]
    pub ssml_gender: String,

    /// Audio encoding of the returned clip
    #[serde(default = "default_audio_encoding")]
    pub audio_encoding: String,

    /// Speaking rate (1.0 = normal)
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,

    /// Pitch adjustment in semitones
    #[serde(default)]
    pub pitch: f32,

    /// Device effects profiles applied to the audio
    #[serde(default = "default_effects_profiles")]
    pub effects_profile_ids: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_speech_timeout_secs")]
    pub timeout_secs: u64,
}

/// Daily scripture behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureConfig {
    /// IANA timezone defining the congregation's calendar day
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Theme used when no theme is set for the month
    #[serde(default = "default_theme")]
    pub default_theme: String,

    /// Persist a day's entry only if no other writer stored one first
    #[serde(default = "default_true")]
    pub exclusive_daily_write: bool,

    /// Congregation named in generation and chat prompts
    #[serde(default = "default_congregation")]
    pub congregation: String,
}

/// Retry and backoff settings for scripture generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (cap for backoff)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Jitter percentage (0.0 to 1.0) for randomizing delays
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

/// Daily trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Run the daily trigger inside `serve`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Local wall-clock time (HH:MM) in the scripture timezone
    #[serde(default = "default_schedule_time")]
    pub time: String,
}

/// Which document store backs themes and the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON file on disk
    #[default]
    File,
    /// Process memory (lost on restart)
    Memory,
}

/// Durability layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the JSON document file
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_genai_api_key_env(),
            model: default_genai_model(),
            chat_model: None,
            base_url: default_genai_base_url(),
            generation_temperature: default_temperature(),
            chat_temperature: default_temperature(),
            timeout_secs: default_genai_timeout_secs(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_speech_endpoint(),
            access_token: None,
            access_token_env: default_speech_token_env(),
            metadata_token_url: default_metadata_token_url(),
            project_id: None,
            language_code: default_language_code(),
            voice_name: default_voice_name(),
            ssml_gender: default_ssml_gender(),
            audio_encoding: default_audio_encoding(),
            speaking_rate: default_speaking_rate(),
            pitch: 0.0,
            effects_profile_ids: default_effects_profiles(),
            timeout_secs: default_speech_timeout_secs(),
        }
    }
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_theme: default_theme(),
            exclusive_daily_write: true,
            congregation: default_congregation(),
        }
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time: default_schedule_time(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: default_storage_path(),
        }
    }
}

// Default value functions
fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_genai_api_key_env() -> String {
    "GENAI_KEY".to_string()
}

fn default_genai_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_genai_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_genai_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_speech_endpoint() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_speech_token_env() -> String {
    "TTS_ACCESS_TOKEN".to_string()
}

fn default_metadata_token_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_voice_name() -> String {
    "en-US-Neural2-F".to_string()
}

fn default_ssml_gender() -> String {
    "FEMALE".to_string()
}

fn default_audio_encoding() -> String {
    "MP3".to_string()
}

fn default_speaking_rate() -> f32 {
    0.92
}

fn default_effects_profiles() -> Vec<String> {
    vec!["small-bluetooth-speaker-class-device".to_string()]
}

fn default_speech_timeout_secs() -> u64 {
    30
}

fn default_timezone() -> String {
    "America/Denver".to_string()
}

fn default_theme() -> String {
    "Encouragement".to_string()
}

fn default_congregation() -> String {
    "RCCG The Eagles Ark".to_string()
}

// Resilience config defaults
fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    4000
}

fn default_jitter() -> f64 {
    0.25
}

fn default_schedule_time() -> String {
    "00:00".to_string()
}

fn default_storage_path() -> PathBuf {
    Settings::daily_word_home().join("store.json")
}
