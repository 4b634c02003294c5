// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Generative client for daily-word
//!
//! Provides abstraction over generative text backends.

pub mod factory;
pub mod mock_provider;
pub mod provider;
pub mod providers;
pub mod retry;

pub use provider::*;
