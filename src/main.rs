// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! modelfit - pick a local coding model that fits your hardware
//!
//! Entry point for the modelfit CLI application.

use std::io;

use clap::Parser;
use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use modelfit::cli::{AdviseArgs, Cli, Commands};
use modelfit::commands;
use modelfit::config::Settings;
use modelfit::error::Result;
use modelfit::hardware::SystemProbe;
use modelfit::models::ModelCatalog;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let mut stderr = io::stderr();
        let _ = stderr.execute(SetForegroundColor(Color::Red));
        eprintln!("Error: {}", e);
        let _ = stderr.execute(ResetColor);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` turns on this crate's diagnostics; `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        let level = if cli.verbose > 1 { "trace" } else { "debug" };
        if let Ok(parsed) = format!("modelfit={}", level).parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    let catalog = ModelCatalog::load(&settings, cli.catalog.as_deref())?;

    match cli.command {
        None => {
            commands::advise::execute(AdviseArgs::default(), &settings, &catalog, &cli.format)
                .await?;
        }
        Some(Commands::Advise(args)) => {
            commands::advise::execute(args, &settings, &catalog, &cli.format).await?;
        }
        Some(Commands::Scan) => {
            let probe =
                SystemProbe::new().with_vram_override(settings.hardware.vram_override_gb);
            commands::scan::execute(&probe, &catalog, &cli.format)?;
        }
        Some(Commands::Modelfile(args)) => {
            commands::modelfile::execute(&args, &catalog)?;
        }
        Some(Commands::Catalog) => {
            commands::catalog::execute(&catalog, &cli.format)?;
        }
    }

    Ok(())
}
