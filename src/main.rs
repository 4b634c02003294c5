// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! daily-word - a themed scripture for every day
//!
//! Entry point for the daily-word server and CLI.

use std::io;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use daily_word::cli::commands;
use daily_word::cli::{Cli, Commands, ServeArgs};
use daily_word::config::Settings;
use daily_word::server;
use daily_word::services::Services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load settings
    let settings_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load_from(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;

    // Dispatch to appropriate command
    let format = cli.format;
    let mut stdout = io::stdout();
    match cli.command {
        Commands::Serve(args) => {
            run_serve(args, settings).await?;
        }
        Commands::Today => {
            let services = Services::from_settings(&settings)?;
            commands::run_today(&services, format, &mut stdout).await?;
        }
        Commands::Generate(args) => {
            let services = Services::from_settings(&settings)?;
            commands::run_generate(&services, args, format, &mut stdout).await?;
        }
        Commands::Theme(args) => {
            let services = Services::from_settings(&settings)?;
            commands::run_theme(&services, args.command, format, &mut stdout).await?;
        }
        Commands::Archive(args) => {
            let services = Services::from_settings(&settings)?;
            commands::run_archive(&services, args.command, format, &mut stdout).await?;
        }
        Commands::Settings(args) => {
            commands::run_settings(args.command, &settings, &settings_path, &mut stdout)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_directives = match verbose {
        0 => "warn,daily_word=info",
        1 => "warn,daily_word=debug",
        _ => "info,daily_word=trace,tower_http=debug",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

/// Run the HTTP server and, unless disabled, the daily scheduler until
/// Ctrl-C.
async fn run_serve(args: ServeArgs, settings: Settings) -> anyhow::Result<()> {
    let services = Services::from_settings(&settings)?;
    let bind = args.bind.unwrap_or_else(|| settings.server.bind.clone());
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if settings.schedule.enabled && !args.no_schedule {
        Some(services.scheduler(&settings)?.spawn(shutdown_rx))
    } else {
        tracing::info!("daily scheduler disabled");
        None
    };

    let shutdown = async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("shutdown requested"),
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for Ctrl-C; running until killed");
                std::future::pending::<()>().await;
            }
        }
        let _ = shutdown_tx.send(true);
    };

    server::serve(listener, services.app_state(), shutdown).await?;

    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "scheduler task ended abnormally");
        }
    }

    Ok(())
}
