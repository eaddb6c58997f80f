// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// modelfit - pick a local coding model that fits your hardware
#[derive(Parser, Debug)]
#[command(name = "modelfit")]
#[command(
    version,
    about = "Pick, install and launch a local coding model that fits your hardware"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path (defaults to ~/.modelfit/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV catalog to use instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect hardware, pick a model, install and launch it (default)
    Advise(AdviseArgs),

    /// Show hardware and matching models without installing anything
    #[command(alias = "hw")]
    Scan,

    /// Print or write an optimized profile file for a model
    Modelfile(ModelfileArgs),

    /// List the effective model catalog
    Catalog,
}

/// Arguments for the advise subcommand
#[derive(clap::Args, Debug, Default, Clone)]
pub struct AdviseArgs {
    /// Stop after the model is installed
    #[arg(long)]
    pub no_launch: bool,

    /// Do not offer to build an optimized profile
    #[arg(long)]
    pub no_profile: bool,
}

/// Arguments for the modelfile subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ModelfileArgs {
    /// Base model, e.g. qwen2.5-coder:7b
    pub model: String,

    /// Context window (defaults to the catalog entry's context)
    #[arg(short, long)]
    pub context: Option<u32>,

    /// Directory to write the file into (prints to stdout otherwise)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Output format for reports
#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_no_command() {
        let cli = Cli::parse_from(["modelfit"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.catalog.is_none());
    }

    #[test]
    fn test_cli_verbose_multiple() {
        let cli = Cli::parse_from(["modelfit", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_catalog_is_global() {
        let cli = Cli::parse_from(["modelfit", "scan", "--catalog", "models.csv"]);
        assert_eq!(cli.catalog, Some(PathBuf::from("models.csv")));
        assert!(matches!(cli.command, Some(Commands::Scan)));
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["modelfit", "--format", "json", "scan"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_hw_alias() {
        let cli = Cli::parse_from(["modelfit", "hw"]);
        assert!(matches!(cli.command, Some(Commands::Scan)));
    }

    #[test]
    fn test_advise_flags() {
        let cli = Cli::parse_from(["modelfit", "advise", "--no-launch"]);
        match cli.command {
            Some(Commands::Advise(args)) => {
                assert!(args.no_launch);
                assert!(!args.no_profile);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_modelfile_args() {
        let cli = Cli::parse_from([
            "modelfit",
            "modelfile",
            "qwen2.5-coder:7b",
            "--context",
            "8192",
            "-o",
            "/tmp/out",
        ]);
        match cli.command {
            Some(Commands::Modelfile(args)) => {
                assert_eq!(args.model, "qwen2.5-coder:7b");
                assert_eq!(args.context, Some(8192));
                assert_eq!(args.output, Some(PathBuf::from("/tmp/out")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_modelfile_requires_model() {
        assert!(Cli::try_parse_from(["modelfit", "modelfile"]).is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["modelfit", "--format", "yaml"]).is_err());
    }
}
