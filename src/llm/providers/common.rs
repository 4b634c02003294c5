// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use reqwest::Response;

use crate::error::{ApiError, DailyWordError};

/// Longest upstream body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// Map a transport-level reqwest failure onto the upstream taxonomy.
///
/// The request URL is stripped so credentials never reach error text.
pub(crate) fn send_error(service: &str, err: reqwest::Error) -> DailyWordError {
    let err = err.without_url();
    if err.is_timeout() {
        DailyWordError::Api(ApiError::Timeout)
    } else if err.is_connect() {
        DailyWordError::Api(ApiError::Network(format!(
            "{} is unreachable: {}",
            service, err
        )))
    } else {
        DailyWordError::Http(err)
    }
}

/// Construct a standardized upstream HTTP error.
pub(crate) fn upstream_http_error(status: u16, body: impl Into<String>) -> DailyWordError {
    let mut body: String = body.into();
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        body = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        body.push_str("...");
    }
    DailyWordError::Api(ApiError::UpstreamHttp { status, body })
}

/// Turn a non-success response into an error, consuming its body.
pub(crate) async fn error_for_status(response: Response) -> DailyWordError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    upstream_http_error(status, body)
}
