// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command handlers for the non-server subcommands
//!
//! Handlers write to a caller-supplied sink so output can be checked in
//! tests without capturing stdout.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::args::{ArchiveCommands, GenerateArgs, OutputFormat, SettingsCommands, ThemeCommands};
use crate::config::Settings;
use crate::error::Result;
use crate::scripture::{DateKey, Resolution, ResolutionSource, Scripture, VersionCode, Versions};
use crate::services::Services;

#[derive(Serialize)]
struct ResolutionOutput<'a> {
    date: String,
    source: String,
    scripture: &'a Scripture,
}

/// `today`
pub async fn run_today(
    services: &Services,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let date = services.resolver.today();
    let resolution = services.resolver.resolve(date).await?;
    write_resolution(&resolution, format, out)
}

/// `generate [--date] [--force]`
pub async fn run_generate(
    services: &Services,
    args: GenerateArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let date = args.date.unwrap_or_else(|| services.resolver.today());

    let resolution = if args.force {
        let scripture = services.resolver.regenerate(date).await?;
        Resolution {
            date,
            scripture,
            source: ResolutionSource::Generated,
        }
    } else {
        services.resolver.resolve(date).await?
    };

    write_resolution(&resolution, format, out)
}

/// `theme ...`
pub async fn run_theme(
    services: &Services,
    command: ThemeCommands,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ThemeCommands::Set { month, theme } => {
            services.themes.set(month, &theme).await?;
            match services.themes.get(month).await? {
                Some(stored) => writeln!(out, "Theme for {} set to \"{}\".", month, stored)?,
                None => writeln!(out, "Theme for {} cleared.", month)?,
            }
        }
        ThemeCommands::Get { month } => match services.themes.get(month).await? {
            Some(theme) => writeln!(out, "{}", theme)?,
            None => writeln!(out, "No theme set for {}.", month)?,
        },
        ThemeCommands::List => {
            let themes = services.themes.list().await?;
            write_listing(&themes, "No themes configured.", format, out)?;
        }
        ThemeCommands::Clear { month } => {
            if services.themes.clear(month).await? {
                writeln!(out, "Theme for {} cleared.", month)?;
            } else {
                writeln!(out, "No theme set for {}.", month)?;
            }
        }
    }
    Ok(())
}

/// `archive ...`
pub async fn run_archive(
    services: &Services,
    command: ArchiveCommands,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ArchiveCommands::Show { date } => match services.archive.get(date).await? {
            Some(scripture) => match format {
                OutputFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&scripture)?)?
                }
                OutputFormat::Text => write_scripture(date, &scripture, None, out)?,
            },
            None => writeln!(out, "No scripture stored for {}.", date)?,
        },
        ArchiveCommands::List { month } => {
            let entries = services.archive.list(month).await?;
            write_listing(&entries, "Archive is empty.", format, out)?;
        }
        ArchiveCommands::Delete { date } => {
            if services.archive.delete(date).await? {
                writeln!(out, "Deleted scripture for {}.", date)?;
            } else {
                writeln!(out, "No scripture stored for {}.", date)?;
            }
        }
    }
    Ok(())
}

/// `settings ...`
pub fn run_settings(
    command: Option<SettingsCommands>,
    settings: &Settings,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    match command.unwrap_or(SettingsCommands::Show) {
        SettingsCommands::Show => {
            writeln!(out, "{}", serde_json::to_string_pretty(settings)?)?;
        }
        SettingsCommands::Path => {
            writeln!(out, "{}", path.display())?;
        }
        SettingsCommands::Init { force } => {
            if path.exists() && !force {
                writeln!(
                    out,
                    "Settings already exist at {} (use --force to overwrite).",
                    path.display()
                )?;
            } else {
                if force && path.exists() {
                    std::fs::remove_file(path)?;
                }
                Settings::default().save_to(path)?;
                writeln!(out, "Wrote default settings to {}.", path.display())?;
            }
        }
    }
    Ok(())
}

fn write_resolution(
    resolution: &Resolution,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = ResolutionOutput {
                date: resolution.date.to_string(),
                source: resolution.source.to_string(),
                scripture: &resolution.scripture,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Text => write_scripture(
            resolution.date,
            &resolution.scripture,
            Some(&resolution.source.to_string()),
            out,
        )?,
    }
    Ok(())
}

fn write_scripture(
    date: DateKey,
    scripture: &Scripture,
    source: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    match source {
        Some(source) => writeln!(out, "{}  {}  ({})", date, scripture.reference, source)?,
        None => writeln!(out, "{}  {}", date, scripture.reference)?,
    }
    write_versions(&scripture.versions, out)?;

    if let (Some(reference), Some(versions)) =
        (&scripture.expanded_reference, &scripture.expanded_versions)
    {
        writeln!(out)?;
        writeln!(out, "Context: {}", reference)?;
        write_versions(versions, out)?;
    }
    Ok(())
}

fn write_versions(versions: &Versions, out: &mut impl Write) -> Result<()> {
    for code in VersionCode::ALL {
        if let Some(text) = versions.get(&code) {
            writeln!(out, "  {:<4} {}", code.as_str(), text)?;
        }
    }
    Ok(())
}

fn write_listing(
    entries: &BTreeMap<String, String>,
    empty: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(entries)?)?,
        OutputFormat::Text if entries.is_empty() => writeln!(out, "{}", empty)?,
        OutputFormat::Text => {
            for (key, value) in entries {
                writeln!(out, "{}  {}", key, value)?;
            }
        }
    }
    Ok(())
}
