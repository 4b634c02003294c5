// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Scripture data types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Bible translations every scripture entry carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VersionCode {
    #[serde(rename = "KJV")]
    Kjv,
    #[serde(rename = "NKJV")]
    Nkjv,
    #[serde(rename = "NIV")]
    Niv,
    #[serde(rename = "MSG")]
    Msg,
    #[serde(rename = "NLT")]
    Nlt,
    #[serde(rename = "AMP")]
    Amp,
}

impl VersionCode {
    /// The required set, in prompt order
    pub const ALL: [VersionCode; 6] = [
        VersionCode::Kjv,
        VersionCode::Nkjv,
        VersionCode::Niv,
        VersionCode::Msg,
        VersionCode::Nlt,
        VersionCode::Amp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionCode::Kjv => "KJV",
            VersionCode::Nkjv => "NKJV",
            VersionCode::Niv => "NIV",
            VersionCode::Msg => "MSG",
            VersionCode::Nlt => "NLT",
            VersionCode::Amp => "AMP",
        }
    }
}

impl fmt::Display for VersionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown version code '{}'", s))
    }
}

/// Passage text keyed by translation
pub type Versions = BTreeMap<VersionCode, String>;

/// One day's passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scripture {
    /// Human-readable citation, e.g. "Hebrews 11:1"
    pub reference: String,

    /// Passage text in every required translation
    pub versions: Versions,

    /// Citation widened by a few verses on each side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_reference: Option<String>,

    /// Widened passage text in every required translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_versions: Option<Versions>,
}

impl Scripture {
    /// Passage text in one translation
    pub fn text(&self, code: VersionCode) -> Option<&str> {
        self.versions.get(&code).map(String::as_str)
    }

    pub fn has_expanded(&self) -> bool {
        self.expanded_reference.is_some() && self.expanded_versions.is_some()
    }
}

/// Normalized form used to compare references for duplicates.
///
/// Case and internal whitespace are ignored, so "john 3:16" and
/// "John  3:16" collide.
pub fn normalize_reference(reference: &str) -> String {
    reference
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
