// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Interactive advisor flow
//!
//! probe → budget → match → report → runner check → choose → pull →
//! optional profile → optional launch. Pull and launch failures are reported
//! and the run still ends normally; a missing runner aborts before any
//! question is asked.

use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use crate::cli::args::{AdviseArgs, OutputFormat};
use crate::config::Settings;
use crate::error::{AdvisorError, Result};
use crate::hardware::{HardwareProbe, SystemProbe};
use crate::launcher::{AssistantLauncher, CommandLauncher};
use crate::matcher::MatchReport;
use crate::models::ModelCatalog;
use crate::runner::{optimized_model_name, write_modelfile, ModelRunner, OllamaCli};
use crate::selection::{ModelChooser, TerminalChooser};

use super::scan::assess;

/// How an advisor run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviseOutcome {
    /// Nothing in the catalog fits this machine
    NothingFits,
    /// The user declined to pick a model
    Cancelled,
    /// The chosen model could not be pulled
    PullFailed { model: String },
    /// A model is installed; later steps may or may not have run
    Ready {
        model: String,
        profile: Option<PathBuf>,
        launched: bool,
    },
}

/// Post-report half of the flow, over injectable collaborators
pub struct Advisor<'a> {
    runner: &'a dyn ModelRunner,
    launcher: &'a dyn AssistantLauncher,
    chooser: &'a mut dyn ModelChooser,
    profile_dir: PathBuf,
    assistant_name: String,
    options: AdviseArgs,
}

impl<'a> Advisor<'a> {
    pub fn new(
        runner: &'a dyn ModelRunner,
        launcher: &'a dyn AssistantLauncher,
        chooser: &'a mut dyn ModelChooser,
        profile_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            launcher,
            chooser,
            profile_dir: profile_dir.into(),
            assistant_name: "the assistant".to_string(),
            options: AdviseArgs::default(),
        }
    }

    /// Builder: name shown in prompts
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    /// Builder: skip steps per command-line flags
    pub fn with_options(mut self, options: AdviseArgs) -> Self {
        self.options = options;
        self
    }

    /// Choose, install, and optionally optimize and launch a model
    pub fn follow_through(&mut self, matches: &MatchReport) -> Result<AdviseOutcome> {
        if matches.is_empty() {
            return Ok(AdviseOutcome::NothingFits);
        }

        let candidates = matches.candidates();
        let chosen = match self.chooser.choose(&candidates)? {
            Some(i) if i < candidates.len() => candidates[i].clone(),
            Some(i) => {
                return Err(AdvisorError::InvalidInput(format!(
                    "selection {} is out of range",
                    i + 1
                )))
            }
            None => return Ok(AdviseOutcome::Cancelled),
        };
        let base = chosen.name().to_string();

        if self.runner.is_installed(&base)? {
            tracing::info!("{} already installed", base);
        } else {
            match self.runner.pull(&base) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    report_failure(&e);
                    return Ok(AdviseOutcome::PullFailed { model: base });
                }
                Err(e) => return Err(e),
            }
        }

        let (model, profile) = self.maybe_optimize(&base, chosen.adjusted_context)?;
        let launched = self.maybe_launch(&model)?;

        Ok(AdviseOutcome::Ready {
            model,
            profile,
            launched,
        })
    }

    /// Returns the model to launch and the profile file, if one was built
    fn maybe_optimize(&mut self, base: &str, context: u32) -> Result<(String, Option<PathBuf>)> {
        if self.options.no_profile {
            return Ok((base.to_string(), None));
        }

        let question = format!(
            "Build an optimized profile for {} with a {} token context?",
            base, context
        );
        if !self.chooser.confirm(&question)? {
            return Ok((base.to_string(), None));
        }

        let path = write_modelfile(&self.profile_dir, base, context)?;
        let optimized = optimized_model_name(base);
        match self.runner.create(&optimized, &path) {
            Ok(()) => Ok((optimized, Some(path))),
            Err(e) if e.is_recoverable() => {
                report_failure(&e);
                Ok((base.to_string(), Some(path)))
            }
            Err(e) => Err(e),
        }
    }

    fn maybe_launch(&mut self, model: &str) -> Result<bool> {
        if self.options.no_launch {
            return Ok(false);
        }

        let question = format!("Launch {} with {}?", self.assistant_name, model);
        if !self.chooser.confirm(&question)? {
            return Ok(false);
        }

        if !self.launcher.is_available() {
            let question = format!("{} is not installed. Install it now?", self.assistant_name);
            if !self.chooser.confirm(&question)? {
                return Ok(false);
            }
            if let Err(e) = self.launcher.install() {
                report_failure(&e);
                return Ok(false);
            }
        }

        match self.launcher.launch(model, &[]) {
            Ok(()) => Ok(true),
            Err(e) if e.is_recoverable() => {
                report_failure(&e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

/// Report a recoverable failure and carry on
fn report_failure(err: &AdvisorError) {
    tracing::warn!("{}", err);
    let mut stderr = io::stderr();
    let _ = stderr.execute(SetForegroundColor(Color::Yellow));
    eprintln!("{}", err);
    let _ = stderr.execute(ResetColor);
}

fn print_outcome(outcome: &AdviseOutcome) {
    match outcome {
        AdviseOutcome::NothingFits => {}
        AdviseOutcome::Cancelled => println!("No model selected."),
        AdviseOutcome::PullFailed { model } => {
            println!("{} was not installed. Try again with 'ollama pull {}'.", model, model)
        }
        AdviseOutcome::Ready {
            model,
            profile,
            launched,
        } => {
            println!("Ready: {}", model);
            if let Some(path) = profile {
                println!("Profile: {}", path.display());
            }
            if !launched {
                println!("Run it later with 'ollama run {}'.", model);
            }
        }
    }
}

/// Execute the advise command
pub async fn execute(
    args: AdviseArgs,
    settings: &Settings,
    catalog: &ModelCatalog,
    format: &OutputFormat,
) -> Result<()> {
    let probe = SystemProbe::new().with_vram_override(settings.hardware.vram_override_gb);
    let assessment = assess(&probe, catalog)?;
    assessment.print(catalog, format)?;

    if assessment.struggles() {
        return Ok(());
    }

    let runner = OllamaCli::locate(&settings.runner)?;
    runner.health_check().await?;

    let launcher = CommandLauncher::new(settings.assistant.clone(), runner.base_url());
    let mut chooser = TerminalChooser::stdio();
    let profile_dir = settings.profiles_dir();

    let outcome = Advisor::new(&runner, &launcher, &mut chooser, profile_dir)
        .with_assistant_name(settings.assistant.command.clone())
        .with_options(args)
        .follow_through(&assessment.matches)?;

    tracing::debug!(?outcome, "advise finished");
    print_outcome(&outcome);
    Ok(())
}

/// Probe and match without the interactive steps; used by callers that
/// supply their own collaborators
pub fn advise_with(
    probe: &dyn HardwareProbe,
    catalog: &ModelCatalog,
    runner: &dyn ModelRunner,
    launcher: &dyn AssistantLauncher,
    chooser: &mut dyn ModelChooser,
    profile_dir: &Path,
) -> Result<AdviseOutcome> {
    let assessment = assess(probe, catalog)?;
    Advisor::new(runner, launcher, chooser, profile_dir).follow_through(&assessment.matches)
}
