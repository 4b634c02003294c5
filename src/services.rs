// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Service wiring
//!
//! Builds the stores, generative client, resolver and chat relay from
//! [`Settings`] so the server and the CLI share one construction path.

use std::sync::Arc;

use crate::chat::ChatRelay;
use crate::config::Settings;
use crate::error::Result;
use crate::llm::factory::ProviderFactory;
use crate::llm::retry::RetryConfig;
use crate::llm::{LlmProvider, TextGenerator};
use crate::scheduler::DailyScheduler;
use crate::scripture::{Clock, DailyResolver, ScriptureGenerator, SystemClock};
use crate::server::{AppState, SharedState};
use crate::speech::{self, SpeechSynthesizer};
use crate::store::{open_store, DocumentStore, ScriptureArchive, ThemeStore};

pub struct Services {
    pub themes: ThemeStore,
    pub archive: ScriptureArchive,
    pub resolver: Arc<DailyResolver>,
    pub relay: Arc<ChatRelay>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Production wiring: configured store, Gemini backend, system clock
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let store = open_store(&settings.storage);
        let provider = ProviderFactory::create_or_unconfigured(settings)?;
        let speech = speech::from_settings(settings)?;

        Self::assemble(settings, store, provider, speech, Arc::new(SystemClock))
    }

    /// Wire services around explicit backends
    pub fn assemble(
        settings: &Settings,
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn LlmProvider>,
        speech: Arc<dyn SpeechSynthesizer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let themes = ThemeStore::new(store.clone());
        let archive = ScriptureArchive::new(store);
        let scripture = &settings.scripture;

        let generator = ScriptureGenerator::new(
            archive.clone(),
            TextGenerator::new(provider.clone(), settings.generation_model()),
        )
        .with_temperature(settings.genai.generation_temperature)
        .with_retry_config(RetryConfig::from(&settings.resilience))
        .with_congregation(scripture.congregation.clone());

        let resolver = DailyResolver::new(
            archive.clone(),
            themes.clone(),
            generator,
            clock.clone(),
            settings.scripture_timezone()?,
        )
        .with_default_theme(scripture.default_theme.clone())
        .with_exclusive_write(scripture.exclusive_daily_write);

        let relay = ChatRelay::new(
            TextGenerator::new(provider, settings.chat_model()),
            speech,
        )
        .with_temperature(settings.genai.chat_temperature)
        .with_default_theme(scripture.default_theme.clone())
        .with_congregation(scripture.congregation.clone());

        tracing::debug!(
            timezone = %resolver.timezone(),
            generation_model = %settings.generation_model(),
            chat_model = %settings.chat_model(),
            "services assembled"
        );

        Ok(Self {
            themes,
            archive,
            resolver: Arc::new(resolver),
            relay: Arc::new(relay),
            clock,
        })
    }

    /// Handler state for the HTTP server
    pub fn app_state(&self) -> SharedState {
        Arc::new(AppState {
            resolver: self.resolver.clone(),
            relay: self.relay.clone(),
        })
    }

    /// Daily trigger at the configured local time
    pub fn scheduler(&self, settings: &Settings) -> Result<DailyScheduler> {
        Ok(DailyScheduler::new(
            self.resolver.clone(),
            self.clock.clone(),
            settings.schedule_time()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock_provider::MockProvider;
    use crate::scripture::FixedClock;
    use crate::speech::DisabledSynthesizer;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn services(settings: &Settings, provider: &MockProvider) -> Services {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 2, 1, 0, 0).unwrap(),
        ));
        Services::assemble(
            settings,
            Arc::new(MemoryStore::new()),
            Arc::new(provider.clone()),
            Arc::new(DisabledSynthesizer),
            clock,
        )
        .unwrap()
    }

    #[test]
    fn test_assemble_uses_configured_timezone() {
        let settings = Settings::default();
        let services = services(&settings, &MockProvider::new());
        assert_eq!(services.resolver.timezone(), chrono_tz::America::Denver);
        assert_eq!(services.resolver.today().to_string(), "2025-03-01");
    }

    #[test]
    fn test_assemble_rejects_unknown_timezone() {
        let mut settings = Settings::default();
        settings.scripture.timezone = "Mars/Olympus".to_string();
        let result = Services::assemble(
            &settings,
            Arc::new(MemoryStore::new()),
            Arc::new(MockProvider::new()),
            Arc::new(DisabledSynthesizer),
            Arc::new(SystemClock),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_chat_uses_chat_model() {
        let mut settings = Settings::default();
        settings.genai.chat_model = Some("chat-only".to_string());
        let provider = MockProvider::new().with_response("Amen.");
        let services = services(&settings, &provider);

        let reply = services
            .relay
            .respond(crate::chat::ChatTurn {
                user_message: "Hello".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(reply.reply_text, "Amen.");
        assert_eq!(provider.last_request().unwrap().model, "chat-only");
    }

    #[test]
    fn test_scheduler_uses_configured_time() {
        let mut settings = Settings::default();
        settings.schedule.time = "05:30".to_string();
        let services = services(&settings, &MockProvider::new());
        let scheduler = services.scheduler(&settings).unwrap();
        // 05:30 MST on March 2nd.
        assert_eq!(
            scheduler.next_fire(),
            Utc.with_ymd_and_hms(2025, 3, 2, 12, 30, 0).unwrap()
        );
    }
}
