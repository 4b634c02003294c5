// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Bounded retry with exponential backoff

use crate::config::settings::ResilienceConfig;
use crate::error::{ApiError, DailyWordError, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry configuration with smart defaults
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first
    pub max_retries: u32,
    /// Base delay in milliseconds (exponentially increased)
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds
    pub max_delay_ms: u64,
    /// Jitter percentage (0.0 to 1.0)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&ResilienceConfig::default())
    }
}

impl From<&ResilienceConfig> for RetryConfig {
    fn from(config: &ResilienceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            jitter: config.jitter,
        }
    }
}

impl RetryConfig {
    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Calculate delay for a given attempt number
    fn calculate_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: base * 2^attempt
        let exponential_ms = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let capped_ms = exponential_ms.min(self.max_delay_ms);

        let jitter_range = (capped_ms as f64 * self.jitter) as i64;
        let jitter_ms = if jitter_range > 0 {
            rand::rng().random_range(-jitter_range..=jitter_range)
        } else {
            0
        };

        let final_ms = (capped_ms as i64 + jitter_ms).max(0) as u64;
        Duration::from_millis(final_ms)
    }
}

/// Determine if an error is worth another attempt
pub fn is_retryable(error: &DailyWordError) -> bool {
    match error {
        DailyWordError::Api(api_error) => match api_error {
            // Retry on transient failures
            ApiError::Network(_) => true,
            ApiError::Timeout => true,
            ApiError::UpstreamHttp { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            // A fresh sample may come back well-formed
            ApiError::EmptyResponse => true,
            ApiError::InvalidResponse(_) => true,
        },
        DailyWordError::Generation(_) => true,
        DailyWordError::Http(err) => err.is_timeout() || err.is_connect(),
        _ => false,
    }
}

/// Outcome of a retried operation that did not succeed
#[derive(Debug)]
pub struct RetryExhausted {
    /// Attempts made, including the first
    pub attempts: u32,
    /// Error returned by the final attempt
    pub error: DailyWordError,
    /// Whether the final error was still retryable (budget ran out)
    pub retryable: bool,
}

/// Retry a function with exponential backoff
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `config` - Retry configuration
/// * `operation_name` - Name of the operation for logging
///
/// Non-retryable errors stop immediately.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    config: &RetryConfig,
    operation_name: &str,
) -> std::result::Result<T, RetryExhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(error) => {
                if !is_retryable(&error) {
                    tracing::warn!(
                        operation = operation_name,
                        error = %error,
                        "failed with non-retryable error"
                    );
                    return Err(RetryExhausted {
                        attempts: attempt + 1,
                        error,
                        retryable: false,
                    });
                }

                if attempt >= config.max_retries {
                    tracing::warn!(
                        operation = operation_name,
                        retries = config.max_retries,
                        error = %error,
                        "exhausted all retries"
                    );
                    return Err(RetryExhausted {
                        attempts: attempt + 1,
                        error,
                        retryable: true,
                    });
                }

                let delay = config.calculate_delay(attempt);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts(),
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, retrying"
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
