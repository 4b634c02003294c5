// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Scripture generation with same-month deduplication
//!
//! Each attempt runs prompt, backend call, parse, validate and the
//! duplicate check against the references already published that month.
//! Attempts are retried with backoff; exhausting the budget yields
//! `GenerationFailed`.

use std::collections::HashSet;

use super::calendar::{DateKey, MonthKey};
use super::model::{normalize_reference, Scripture};
use super::parse::parse_scripture;
use super::prompt::generation_prompt;
use crate::error::{DailyWordError, GenerationError, Result};
use crate::llm::retry::{with_retry, RetryConfig, RetryExhausted};
use crate::llm::TextGenerator;
use crate::store::ScriptureArchive;

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Inputs for one generation, rebuilt on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub theme: String,
    pub day: u32,
    pub year: i32,
    pub month: u32,
    /// References already used this month, in date order
    pub excluded_references: Vec<String>,
}

impl GenerationRequest {
    /// Whether `reference` repeats one already used this month
    pub fn is_excluded(&self, reference: &str) -> bool {
        let trimmed = reference.trim();
        let normalized = normalize_reference(reference);
        self.excluded_references
            .iter()
            .any(|used| used.trim() == trimmed || normalize_reference(used) == normalized)
    }
}

pub struct ScriptureGenerator {
    archive: ScriptureArchive,
    text: TextGenerator,
    temperature: f32,
    retry: RetryConfig,
    congregation: String,
}

impl ScriptureGenerator {
    pub fn new(archive: ScriptureArchive, text: TextGenerator) -> Self {
        Self {
            archive,
            text,
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryConfig::default(),
            congregation: "the congregation".to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_congregation(mut self, congregation: impl Into<String>) -> Self {
        self.congregation = congregation.into();
        self
    }

    /// References already published in `month`, without duplicates
    pub async fn excluded_references(&self, month: MonthKey) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .archive
            .references_for_month(month)
            .await?
            .into_iter()
            .filter(|reference| seen.insert(normalize_reference(reference)))
            .collect())
    }

    /// Produce a scripture for `theme` on the given day that is not yet
    /// used in that month. Nothing is persisted.
    pub async fn generate(
        &self,
        theme: &str,
        day: u32,
        year: i32,
        month: u32,
    ) -> Result<Scripture> {
        let theme = theme.trim();
        if theme.is_empty() {
            return Err(DailyWordError::InvalidInput(
                "theme must not be empty".to_string(),
            ));
        }
        let date = DateKey::from_ymd(year, month, day)?;

        let request = GenerationRequest {
            theme: theme.to_string(),
            day,
            year,
            month,
            excluded_references: self.excluded_references(date.month_key()).await?,
        };

        self.generate_for(&request).await
    }

    /// Run the retried generation cycle for a prepared request
    pub async fn generate_for(&self, request: &GenerationRequest) -> Result<Scripture> {
        let prompt = generation_prompt(request, &self.congregation);
        let prompt = prompt.as_str();

        tracing::debug!(
            theme = %request.theme,
            excluded = request.excluded_references.len(),
            "generating scripture"
        );

        let outcome = with_retry(
            |attempt| async move { self.attempt(request, prompt, attempt).await },
            &self.retry,
            "scripture generation",
        )
        .await;

        match outcome {
            Ok(scripture) => Ok(scripture),
            Err(RetryExhausted {
                attempts,
                error,
                retryable: true,
            }) => Err(DailyWordError::GenerationFailed {
                attempts,
                last_error: error.to_string(),
            }),
            Err(RetryExhausted { error, .. }) => Err(error),
        }
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        prompt: &str,
        attempt: u32,
    ) -> Result<Scripture> {
        let raw = self.text.generate_text(prompt, self.temperature).await?;
        let scripture = parse_scripture(&raw)?;

        if request.is_excluded(&scripture.reference) {
            tracing::warn!(
                attempt = attempt + 1,
                reference = %scripture.reference,
                "backend repeated a reference already used this month"
            );
            return Err(GenerationError::DuplicateReference(scripture.reference).into());
        }

        Ok(scripture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock_provider::MockProvider;
    use crate::scripture::VersionCode;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn response(reference: &str) -> String {
        let versions: serde_json::Map<String, serde_json::Value> = VersionCode::ALL
            .iter()
            .map(|code| (code.to_string(), json!(format!("{} in {}", reference, code))))
            .collect();
        json!({"reference": reference, "versions": versions}).to_string()
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter: 0.0,
        }
    }

    fn generator(provider: &MockProvider) -> (ScriptureArchive, ScriptureGenerator) {
        let archive = ScriptureArchive::new(Arc::new(MemoryStore::new()));
        let text = TextGenerator::new(Arc::new(provider.clone()), "test-model");
        let generator = ScriptureGenerator::new(archive.clone(), text)
            .with_retry_config(fast_retry())
            .with_congregation("Grace Chapel");
        (archive, generator)
    }

    #[test]
    fn test_is_excluded_ignores_case_and_spacing() {
        let request = GenerationRequest {
            theme: "Faith".to_string(),
            day: 2,
            year: 2025,
            month: 3,
            excluded_references: vec!["John 3:16".to_string()],
        };
        assert!(request.is_excluded("John 3:16"));
        assert!(request.is_excluded(" john  3:16 "));
        assert!(!request.is_excluded("John 3:17"));
    }

    #[tokio::test]
    async fn test_generate_first_attempt() {
        let provider = MockProvider::new().with_response(response("Hebrews 11:1"));
        let (_, generator) = generator(&provider);

        let scripture = generator.generate("Faith", 1, 2025, 3).await.unwrap();
        assert_eq!(scripture.reference, "Hebrews 11:1");
        assert_eq!(provider.call_count(), 1);

        let request = provider.last_request().unwrap();
        assert!(request.prompt.contains("Faith"));
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_generate_retries_after_duplicate() {
        let provider = MockProvider::new().with_responses(vec![
            response("Hebrews 11:1"),
            response("Romans 10:17"),
        ]);
        let (archive, generator) = generator(&provider);
        let day_one: DateKey = "2025-03-01".parse().unwrap();
        archive
            .put(day_one, &parse_scripture(&response("Hebrews 11:1")).unwrap())
            .await
            .unwrap();

        let scripture = generator.generate("Faith", 2, 2025, 3).await.unwrap();
        assert_eq!(scripture.reference, "Romans 10:17");
        assert_eq!(provider.call_count(), 2);
        assert!(provider.recorded_requests()[0].prompt.contains("Hebrews 11:1"));
    }

    #[tokio::test]
    async fn test_generate_exhausts_on_malformed_output() {
        let provider = MockProvider::new().with_response("Sorry, I cannot help with that.");
        let (_, generator) = generator(&provider);

        let err = generator.generate("Faith", 1, 2025, 3).await.unwrap_err();
        match err {
            DailyWordError::GenerationFailed {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("Invalid scripture response"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_generate_does_not_retry_client_errors() {
        let provider = MockProvider::new().with_http_error(400, "bad request");
        let (_, generator) = generator(&provider);

        let err = generator.generate("Faith", 1, 2025, 3).await.unwrap_err();
        assert!(matches!(err, DailyWordError::Api(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_rejects_impossible_date() {
        let provider = MockProvider::new().with_response(response("Hebrews 11:1"));
        let (_, generator) = generator(&provider);

        let err = generator.generate("Faith", 30, 2025, 2).await.unwrap_err();
        assert!(matches!(err, DailyWordError::InvalidInput(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_excluded_references_deduplicates() {
        let provider = MockProvider::new();
        let (archive, generator) = generator(&provider);
        for (day, reference) in [("2025-03-01", "Psalm 23:1"), ("2025-03-02", "psalm 23:1")] {
            let scripture = parse_scripture(&response(reference)).unwrap();
            archive.put(day.parse().unwrap(), &scripture).await.unwrap();
        }

        let excluded = generator
            .excluded_references(MonthKey::new(2025, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(excluded, vec!["Psalm 23:1"]);
    }
}
