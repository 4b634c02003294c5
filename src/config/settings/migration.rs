// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use serde_json::Value;

/// Rewrite legacy keys before deserializing.
///
/// Older deployments stored the generative API key as `genai.key`; it is
/// now `genai.api_key`. An explicit `api_key` always wins.
pub(super) fn migrate_on_load(mut value: Value) -> Value {
    if let Some(genai) = value.get_mut("genai").and_then(Value::as_object_mut) {
        if let Some(legacy) = genai.remove("key") {
            genai.entry("api_key").or_insert(legacy);
        }
    }
    value
}

/// Deep-merge two JSON values.
/// `base` is existing file content, `overlay` is serialized current struct.
/// Overlay values take priority.
pub(super) fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = if let Some(base_val) = base_map.remove(&key) {
                    deep_merge(base_val, overlay_val)
                } else {
                    overlay_val
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_base, overlay) => overlay,
    }
}
