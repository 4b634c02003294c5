// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Upstream backend implementations

pub(crate) mod common;
pub mod gemini;

pub use gemini::GeminiProvider;
