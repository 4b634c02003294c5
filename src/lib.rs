// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! daily-word - a themed scripture for every day.
//!
//! This crate exposes the shared runtime used by the `daily-word` binary
//! (`src/main.rs`) for both its HTTP server and its CLI commands.
//!
//! Architecture highlights:
//! - `store`: document store abstraction, theme store and scripture archive
//! - `llm`: generative client abstraction, Gemini backend and retry policy
//! - `scripture`: calendar keys, prompt/parse, generator and daily resolver
//! - `scheduler`: timezone-aware daily trigger
//! - `chat`, `speech`: conversational relay with optional voice
//! - `server`: axum routes; `services`: wiring from settings

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod scheduler;
pub mod scripture;
pub mod server;
pub mod services;
pub mod speech;
pub mod store;

pub use error::{DailyWordError, Result};
