// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Daily scripture pipeline
//!
//! Generation with same-month deduplication, and date-keyed resolution
//! against the archive.

pub mod calendar;
pub mod generator;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod resolver;

pub use calendar::{Clock, DateKey, FixedClock, MonthKey, SystemClock};
pub use generator::{GenerationRequest, ScriptureGenerator};
pub use model::{normalize_reference, Scripture, VersionCode, Versions};
pub use resolver::{DailyResolver, Resolution, ResolutionSource};
