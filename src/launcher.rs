// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Coding assistant launcher
//!
//! Starts the assistant (aider by default) against the chosen local model.
//! The assistant addresses local models as `<prefix><name>`, e.g.
//! `ollama/qwen2.5-coder:7b`.

use std::process::{Command, Stdio};

use crate::config::AssistantConfig;
use crate::error::{AdvisorError, Result};
use crate::runner::ollama::find_binary;

/// Environment variable the assistant reads to find the runner
pub const API_BASE_ENV: &str = "OLLAMA_API_BASE";

/// Starts a coding assistant on a local model
#[cfg_attr(test, mockall::automock)]
pub trait AssistantLauncher {
    /// Whether the assistant command can be found
    fn is_available(&self) -> bool;

    /// Install the assistant
    fn install(&self) -> Result<()>;

    /// Run the assistant on `model` in the foreground until it exits
    fn launch(&self, model: &str, extra_args: &[String]) -> Result<()>;
}

/// Launcher driven by [`AssistantConfig`]
pub struct CommandLauncher {
    config: AssistantConfig,
    api_base: String,
}

impl CommandLauncher {
    pub fn new(config: AssistantConfig, api_base: impl Into<String>) -> Self {
        Self {
            config,
            api_base: api_base.into(),
        }
    }

    /// Model argument in the assistant's addressing scheme
    pub fn model_arg(&self, model: &str) -> String {
        format!("{}{}", self.config.model_prefix, model)
    }

    /// Full argument list for a launch: flag, model, configured extras,
    /// then per-call extras
    pub fn launch_args(&self, model: &str, extra_args: &[String]) -> Vec<String> {
        let mut args = vec![self.config.model_flag.clone(), self.model_arg(model)];
        args.extend(self.config.extra_args.iter().cloned());
        args.extend(extra_args.iter().cloned());
        args
    }
}

impl AssistantLauncher for CommandLauncher {
    fn is_available(&self) -> bool {
        find_binary(&self.config.command).is_some()
    }

    fn install(&self) -> Result<()> {
        let (program, args) = self.config.install_command.split_first().ok_or_else(|| {
            AdvisorError::LaunchFailed("assistant.install_command is empty".to_string())
        })?;

        tracing::info!("Installing assistant: {}", self.config.install_command.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| AdvisorError::LaunchFailed(format!("failed to run {}: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(AdvisorError::LaunchFailed(format!(
                "'{}' exited with {}",
                self.config.install_command.join(" "),
                status
            )))
        }
    }

    fn launch(&self, model: &str, extra_args: &[String]) -> Result<()> {
        let args = self.launch_args(model, extra_args);
        tracing::info!("Launching {} {}", self.config.command, args.join(" "));

        let status = Command::new(&self.config.command)
            .args(&args)
            .env(API_BASE_ENV, &self.api_base)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                AdvisorError::LaunchFailed(format!("failed to start {}: {}", self.config.command, e))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(AdvisorError::LaunchFailed(format!(
                "{} exited with {}",
                self.config.command, status
            )))
        }
    }
}
