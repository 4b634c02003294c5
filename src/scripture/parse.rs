// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Parsing and validation of generated scripture
//!
//! Backends often wrap the JSON object in a markdown code fence or add a
//! sentence before it. Both are tolerated; anything else that fails to
//! produce a complete scripture is an `InvalidResponseShape`.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::model::{Scripture, VersionCode, Versions};
use crate::error::GenerationError;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("leading fence pattern"));

static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("trailing fence pattern"));

/// Remove a surrounding markdown code fence
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = LEADING_FENCE
        .find(trimmed)
        .map(|m| m.end())
        .unwrap_or(0);
    let body = &trimmed[start..];
    let end = TRAILING_FENCE
        .find(body)
        .map(|m| m.start())
        .unwrap_or(body.len());
    body[..end].trim()
}

/// The outermost `{ ... }` span, dropping any commentary around it
fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse backend output into a validated scripture
pub fn parse_scripture(raw: &str) -> Result<Scripture, GenerationError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(first_error) => json_object_span(cleaned)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| {
                GenerationError::InvalidResponseShape(format!("not JSON: {}", first_error))
            })?,
    };

    let Value::Object(object) = value else {
        return Err(GenerationError::InvalidResponseShape(
            "expected a JSON object".to_string(),
        ));
    };

    let reference = non_empty_str(&object, "reference").ok_or_else(|| {
        GenerationError::InvalidResponseShape("missing or empty 'reference'".to_string())
    })?;

    let versions = object
        .get("versions")
        .ok_or_else(|| GenerationError::InvalidResponseShape("missing 'versions'".to_string()))
        .and_then(|value| read_versions(value, "versions"))?;

    let (expanded_reference, expanded_versions) = read_expanded(&object, &reference);

    Ok(Scripture {
        reference,
        versions,
        expanded_reference,
        expanded_versions,
    })
}

fn non_empty_str(object: &Map<String, Value>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read a version map that must cover every required code
fn read_versions(value: &Value, field: &str) -> Result<Versions, GenerationError> {
    let Value::Object(raw) = value else {
        return Err(GenerationError::InvalidResponseShape(format!(
            "'{}' must be an object",
            field
        )));
    };

    let mut versions = Versions::new();
    for (key, text) in raw {
        let (Ok(code), Some(text)) = (key.parse::<VersionCode>(), text.as_str()) else {
            continue;
        };
        let text = text.trim();
        if !text.is_empty() {
            versions.insert(code, text.to_string());
        }
    }

    let missing: Vec<&str> = VersionCode::ALL
        .iter()
        .filter(|code| !versions.contains_key(*code))
        .map(VersionCode::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(GenerationError::InvalidResponseShape(format!(
            "'{}' is missing {}",
            field,
            missing.join(", ")
        )));
    }

    Ok(versions)
}

/// Expanded context is optional; an incomplete pair is dropped as a whole
fn read_expanded(
    object: &Map<String, Value>,
    reference: &str,
) -> (Option<String>, Option<Versions>) {
    let expanded_reference = non_empty_str(object, "expandedReference");
    let expanded_versions = object.get("expandedVersions");

    match (expanded_reference, expanded_versions) {
        (Some(expanded_reference), Some(value)) => match read_versions(value, "expandedVersions") {
            Ok(versions) => (Some(expanded_reference), Some(versions)),
            Err(e) => {
                tracing::warn!(reference, error = %e, "dropping incomplete expanded context");
                (None, None)
            }
        },
        _ => {
            tracing::warn!(reference, "scripture generated without expanded context");
            (None, None)
        }
    }
}
