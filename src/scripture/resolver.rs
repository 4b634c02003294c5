// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Daily resolution: cached entry or generate-then-persist
//!
//! "Today" is computed from an injected clock in the configured timezone.
//! A date that already has an archived entry is served without touching
//! the generative backend.

use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;

use super::calendar::{Clock, DateKey, MonthKey};
use super::generator::ScriptureGenerator;
use super::model::Scripture;
use crate::error::Result;
use crate::store::{ScriptureArchive, ThemeStore};

const DEFAULT_THEME: &str = "Encouragement";

/// Where a resolved scripture came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Already archived for the date
    Cached,
    /// Generated and persisted by this call
    Generated,
    /// Generated, but another writer persisted the date first
    ConcurrentWriter,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionSource::Cached => "cached",
            ResolutionSource::Generated => "generated",
            ResolutionSource::ConcurrentWriter => "concurrent-writer",
        };
        f.write_str(label)
    }
}

/// A scripture resolved for a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub date: DateKey,
    pub scripture: Scripture,
    pub source: ResolutionSource,
}

pub struct DailyResolver {
    archive: ScriptureArchive,
    themes: ThemeStore,
    generator: ScriptureGenerator,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    default_theme: String,
    exclusive_write: bool,
}

impl DailyResolver {
    pub fn new(
        archive: ScriptureArchive,
        themes: ThemeStore,
        generator: ScriptureGenerator,
        clock: Arc<dyn Clock>,
        timezone: Tz,
    ) -> Self {
        Self {
            archive,
            themes,
            generator,
            clock,
            timezone,
            default_theme: DEFAULT_THEME.to_string(),
            exclusive_write: true,
        }
    }

    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    /// When false, a generated entry overwrites whatever is stored for the
    /// date instead of yielding to an earlier writer.
    pub fn with_exclusive_write(mut self, exclusive: bool) -> Self {
        self.exclusive_write = exclusive;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> DateKey {
        self.clock.today_in(self.timezone)
    }

    /// The month's theme, or the default theme when none is set
    pub async fn theme_for(&self, month: MonthKey) -> Result<String> {
        self.themes.get_or(month, &self.default_theme).await
    }

    /// Today's scripture, generating and persisting it on first request
    pub async fn resolve_today(&self) -> Result<Scripture> {
        Ok(self.resolve(self.today()).await?.scripture)
    }

    /// Scripture for any date, generating and persisting it if missing,
    /// along with where the entry came from
    pub async fn resolve(&self, date: DateKey) -> Result<Resolution> {
        if let Some(scripture) = self.archive.get(date).await? {
            tracing::debug!(date_key = %date, reference = %scripture.reference, "archive hit");
            return Ok(Resolution {
                date,
                scripture,
                source: ResolutionSource::Cached,
            });
        }

        let scripture = self.generate(date).await?;
        self.persist(date, scripture).await
    }

    /// Replace a date's entry with a freshly generated one.
    ///
    /// The existing entry stays in place (and counts as used for the
    /// month) until the replacement has been generated.
    pub async fn regenerate(&self, date: DateKey) -> Result<Scripture> {
        let scripture = self.generate(date).await?;
        self.archive.put(date, &scripture).await?;
        tracing::info!(
            date_key = %date,
            reference = %scripture.reference,
            "scripture regenerated"
        );
        Ok(scripture)
    }

    /// Resolve today for the daily trigger and log the outcome
    pub async fn run_scheduled(&self) -> Result<Resolution> {
        let date = self.today();
        match self.resolve(date).await {
            Ok(resolution) => {
                tracing::info!(
                    date_key = %date,
                    reference = %resolution.scripture.reference,
                    source = %resolution.source,
                    "daily scripture ready"
                );
                Ok(resolution)
            }
            Err(e) => {
                tracing::error!(date_key = %date, error = %e, "daily scripture run failed");
                Err(e)
            }
        }
    }

    async fn generate(&self, date: DateKey) -> Result<Scripture> {
        let theme = self.theme_for(date.month_key()).await?;
        tracing::info!(date_key = %date, theme = %theme, "generating daily scripture");
        self.generator
            .generate(&theme, date.day(), date.year(), date.month())
            .await
    }

    async fn persist(&self, date: DateKey, scripture: Scripture) -> Result<Resolution> {
        if !self.exclusive_write {
            self.archive.put(date, &scripture).await?;
            return Ok(generated(date, scripture));
        }

        if self.archive.put_if_absent(date, &scripture).await? {
            return Ok(generated(date, scripture));
        }

        match self.archive.get(date).await? {
            Some(stored) => {
                tracing::info!(
                    date_key = %date,
                    discarded = %scripture.reference,
                    kept = %stored.reference,
                    "another writer stored this date first"
                );
                Ok(Resolution {
                    date,
                    scripture: stored,
                    source: ResolutionSource::ConcurrentWriter,
                })
            }
            // Removed between the two calls; store ours.
            None => {
                self.archive.put(date, &scripture).await?;
                Ok(generated(date, scripture))
            }
        }
    }
}

fn generated(date: DateKey, scripture: Scripture) -> Resolution {
    tracing::info!(date_key = %date, reference = %scripture.reference, "scripture stored");
    Resolution {
        date,
        scripture,
        source: ResolutionSource::Generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DailyWordError;
    use crate::llm::mock_provider::MockProvider;
    use crate::llm::retry::RetryConfig;
    use crate::llm::TextGenerator;
    use crate::scripture::calendar::FixedClock;
    use crate::scripture::VersionCode;
    use crate::store::{DocumentStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn response(reference: &str) -> String {
        let versions: serde_json::Map<String, serde_json::Value> = VersionCode::ALL
            .iter()
            .map(|code| (code.to_string(), json!(format!("{} in {}", reference, code))))
            .collect();
        json!({"reference": reference, "versions": versions}).to_string()
    }

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        resolver: DailyResolver,
    }

    fn harness(provider: &MockProvider) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let archive = ScriptureArchive::new(store.clone());
        let themes = ThemeStore::new(store.clone());
        let text = TextGenerator::new(Arc::new(provider.clone()), "test-model");
        let generator = ScriptureGenerator::new(archive.clone(), text).with_retry_config(
            RetryConfig {
                max_retries: 2,
                base_delay_ms: 1,
                max_delay_ms: 2,
                jitter: 0.0,
            },
        );
        // 18:00 in Denver on March 1st.
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 2, 1, 0, 0).unwrap(),
        ));
        let resolver = DailyResolver::new(
            archive,
            themes,
            generator,
            clock.clone(),
            Tz::America__Denver,
        );
        Harness {
            store,
            clock,
            resolver,
        }
    }

    #[tokio::test]
    async fn test_today_uses_timezone() {
        let h = harness(&MockProvider::new());
        assert_eq!(h.resolver.today().to_string(), "2025-03-01");
    }

    #[tokio::test]
    async fn test_second_resolve_is_cached() {
        let provider = MockProvider::new().with_response(response("Hebrews 11:1"));
        let h = harness(&provider);

        let first = h.resolver.resolve_today().await.unwrap();
        let second = h.resolver.resolve(h.resolver.today()).await.unwrap();

        assert_eq!(second.source, ResolutionSource::Cached);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second.scripture).unwrap()
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_uses_month_theme_or_default() {
        let provider = MockProvider::new()
            .with_responses(vec![response("Joshua 1:9"), response("Hebrews 11:1")]);
        let h = harness(&provider);

        h.resolver.resolve_today().await.unwrap();
        assert!(provider.last_request().unwrap().prompt.contains("\"Encouragement\""));

        ThemeStore::new(h.store.clone())
            .set(MonthKey::new(2025, 3).unwrap(), "Faith")
            .await
            .unwrap();
        h.clock.set(Utc.with_ymd_and_hms(2025, 3, 3, 1, 0, 0).unwrap());

        let scripture = h.resolver.resolve_today().await.unwrap();
        assert_eq!(scripture.reference, "Hebrews 11:1");
        assert!(provider.last_request().unwrap().prompt.contains("\"Faith\""));
    }

    #[tokio::test]
    async fn test_failure_persists_nothing() {
        let provider = MockProvider::new().with_response("not a scripture");
        let h = harness(&provider);

        let err = h.resolver.resolve_today().await.unwrap_err();
        assert!(matches!(err, DailyWordError::GenerationFailed { attempts: 3, .. }));
        assert!(h
            .store
            .get(crate::store::archive::DAILY_SCRIPTURE_DOCUMENT)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_exclusive_write_keeps_earlier_entry() {
        let provider = MockProvider::new().with_response(response("Romans 10:17"));
        let h = harness(&provider);
        let today = h.resolver.today();
        let archive = ScriptureArchive::new(h.store.clone());

        // Simulate a writer landing between the cache check and our write.
        let winner = crate::scripture::parse::parse_scripture(&response("Hebrews 11:1")).unwrap();
        let generated = h.resolver.generate(today).await.unwrap();
        archive.put(today, &winner).await.unwrap();

        let resolution = h.resolver.persist(today, generated).await.unwrap();
        assert_eq!(resolution.source, ResolutionSource::ConcurrentWriter);
        assert_eq!(resolution.scripture.reference, "Hebrews 11:1");
        assert_eq!(
            archive.get(today).await.unwrap().unwrap().reference,
            "Hebrews 11:1"
        );
    }

    #[tokio::test]
    async fn test_regenerate_replaces_entry_with_new_reference() {
        let provider = MockProvider::new().with_responses(vec![
            response("Hebrews 11:1"),
            response("Hebrews 11:1"),
            response("Romans 10:17"),
        ]);
        let h = harness(&provider);
        let today = h.resolver.today();

        h.resolver.resolve_today().await.unwrap();
        let replaced = h.resolver.regenerate(today).await.unwrap();

        assert_eq!(replaced.reference, "Romans 10:17");
        assert_eq!(provider.call_count(), 3);
        let stored = ScriptureArchive::new(h.store.clone())
            .get(today)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.reference, "Romans 10:17");
    }

    #[tokio::test]
    async fn test_run_scheduled_reports_source() {
        let provider = MockProvider::new().with_response(response("Psalm 46:1"));
        let h = harness(&provider);

        let first = h.resolver.run_scheduled().await.unwrap();
        let second = h.resolver.run_scheduled().await.unwrap();
        assert_eq!(first.source, ResolutionSource::Generated);
        assert_eq!(second.source, ResolutionSource::Cached);
        assert_eq!(provider.call_count(), 1);
    }
}
