// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::Arc;

use chrono::{NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use serde_json::json;

use daily_word::error::DailyWordError;
use daily_word::llm::mock_provider::MockProvider;
use daily_word::llm::retry::RetryConfig;
use daily_word::llm::TextGenerator;
use daily_word::scheduler::next_fire_after;
use daily_word::scripture::{
    normalize_reference, DateKey, GenerationRequest, ScriptureGenerator, VersionCode,
};
use daily_word::store::{MemoryStore, ScriptureArchive};

const BOOKS: [&str; 8] = [
    "Genesis", "Psalm", "Proverbs", "Isaiah", "Matthew", "John", "Romans", "1 Peter",
];

fn reference_strategy() -> impl Strategy<Value = String> {
    (0..BOOKS.len(), 1u32..=50, 1u32..=30)
        .prop_map(|(book, chapter, verse)| format!("{} {}:{}", BOOKS[book], chapter, verse))
}

/// Same reference with scrambled casing and padding
fn variant_strategy(reference: String) -> impl Strategy<Value = String> {
    (any::<bool>(), 0usize..3, 0usize..3).prop_map(move |(upper, left, right)| {
        let cased = if upper {
            reference.to_uppercase()
        } else {
            reference.to_lowercase()
        };
        format!("{}{}{}", " ".repeat(left), cased.replace(' ', "  "), " ".repeat(right))
    })
}

fn response(reference: &str) -> String {
    let versions: serde_json::Map<String, serde_json::Value> = VersionCode::ALL
        .iter()
        .map(|code| (code.to_string(), json!("text")))
        .collect();
    json!({"reference": reference, "versions": versions}).to_string()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_normalize_is_idempotent(reference in "[ a-zA-Z0-9:]{0,30}") {
        let once = normalize_reference(&reference);
        prop_assert_eq!(normalize_reference(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
    }

    #[test]
    fn prop_variants_of_used_references_are_excluded(
        (used, variant) in reference_strategy()
            .prop_flat_map(|r| (Just(r.clone()), variant_strategy(r)))
    ) {
        let request = GenerationRequest {
            theme: "Faith".to_string(),
            day: 15,
            year: 2025,
            month: 3,
            excluded_references: vec![used],
        };
        prop_assert!(request.is_excluded(&variant));
    }

    #[test]
    fn prop_next_fire_is_after_now_and_within_two_days(
        offset_minutes in 0i64..(366 * 24 * 60),
        hour in 0u32..24,
        minute in 0u32..60,
        zone in prop::sample::select(vec![
            Tz::America__Denver,
            Tz::Europe__London,
            Tz::Australia__Sydney,
            Tz::UTC,
        ]),
    ) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::minutes(offset_minutes);
        let at = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();

        let fire = next_fire_after(now, zone, at);
        prop_assert!(fire > now);
        prop_assert!(fire - now <= chrono::Duration::hours(49));
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 24, .. ProptestConfig::default() })]

    /// Whatever was stored earlier in the month, a backend that only ever
    /// repeats one of those references never gets a new entry persisted.
    #[test]
    fn prop_same_month_duplicates_never_persist(
        used in prop::collection::btree_set(reference_strategy(), 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let used: Vec<String> = used.into_iter().collect();
        let repeated = pick.get(&used).to_lowercase();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (err, stored) = runtime.block_on(async {
            let archive = ScriptureArchive::new(Arc::new(MemoryStore::new()));
            for (i, reference) in used.iter().enumerate() {
                let date = DateKey::from_ymd(2025, 3, i as u32 + 1).unwrap();
                archive
                    .put(date, &serde_json::from_str(&response(reference)).unwrap())
                    .await
                    .unwrap();
            }

            let provider = MockProvider::new().with_response(response(&repeated));
            let generator = ScriptureGenerator::new(
                archive.clone(),
                TextGenerator::new(Arc::new(provider), "gemini-test"),
            )
            .with_retry_config(RetryConfig {
                max_retries: 1,
                base_delay_ms: 1,
                max_delay_ms: 1,
                jitter: 0.0,
            });

            let err = generator.generate("Faith", 20, 2025, 3).await.unwrap_err();
            let stored = archive
                .get(DateKey::from_ymd(2025, 3, 20).unwrap())
                .await
                .unwrap();
            (err, stored)
        });

        let is_generation_failure = matches!(err, DailyWordError::GenerationFailed { .. });
        prop_assert!(is_generation_failure);
        prop_assert!(stored.is_none());
    }
}
