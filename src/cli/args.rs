// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for daily-word.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scripture::{DateKey, MonthKey};

/// daily-word - a themed scripture for every day
#[derive(Parser, Debug)]
#[command(name = "daily-word")]
#[command(version, about = "Serve a themed daily scripture and a chat assistant about it")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server and the daily scheduler
    Serve(ServeArgs),

    /// Print today's scripture, generating it if needed
    Today,

    /// Resolve the scripture for a specific date
    Generate(GenerateArgs),

    /// Manage monthly themes
    Theme(ThemeArgs),

    /// Inspect or prune the scripture archive
    Archive(ArchiveArgs),

    /// Show or initialize configuration
    #[command(alias = "config")]
    Settings(SettingsArgs),
}

/// Arguments for the serve subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Do not start the daily scheduler
    #[arg(long)]
    pub no_schedule: bool,
}

/// Arguments for the generate subcommand
#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Date as YYYY-MM-DD (defaults to today in the scripture timezone)
    #[arg(short, long)]
    pub date: Option<DateKey>,

    /// Replace an existing entry with a freshly generated one
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for theme management
#[derive(clap::Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommands,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Set the theme for a month
    Set {
        /// Month as YYYY-MM
        month: MonthKey,
        /// Theme text
        theme: String,
    },

    /// Show the theme for a month
    Get {
        /// Month as YYYY-MM
        month: MonthKey,
    },

    /// List all configured themes
    List,

    /// Remove the theme for a month
    Clear {
        /// Month as YYYY-MM
        month: MonthKey,
    },
}

/// Arguments for archive management
#[derive(clap::Args, Debug)]
pub struct ArchiveArgs {
    #[command(subcommand)]
    pub command: ArchiveCommands,
}

#[derive(Subcommand, Debug)]
pub enum ArchiveCommands {
    /// Show the stored scripture for a date
    Show {
        /// Date as YYYY-MM-DD
        date: DateKey,
    },

    /// List stored references
    List {
        /// Only entries in this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<MonthKey>,
    },

    /// Delete the stored scripture for a date
    Delete {
        /// Date as YYYY-MM-DD
        date: DateKey,
    },
}

/// Arguments for settings
#[derive(clap::Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: Option<SettingsCommands>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write default settings if no file exists
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
