// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Ollama CLI wrapper
//!
//! Model management goes through the `ollama` binary so the user sees its
//! native progress output. The HTTP API is only used to check that the
//! server is up.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use reqwest::Client;

use super::ModelRunner;
use crate::config::RunnerConfig;
use crate::error::{AdvisorError, Result};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

const INSTALL_HINT: &str =
    "Install Ollama from https://ollama.com/download, then run 'ollama serve'";

/// Ollama model runner
pub struct OllamaCli {
    binary: PathBuf,
    base_url: String,
    client: Client,
}

impl OllamaCli {
    /// Use an explicit binary path
    pub fn with_binary(binary: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Find the configured binary on PATH.
    ///
    /// Fails with `InstallerUnavailable` and install guidance when absent.
    pub fn locate(config: &RunnerConfig) -> Result<Self> {
        let binary = find_binary(&config.binary).ok_or_else(|| {
            AdvisorError::InstallerUnavailable(format!(
                "'{}' not found on PATH. {}",
                config.binary, INSTALL_HINT
            ))
        })?;
        tracing::info!("Found model runner at: {}", binary.display());
        Ok(Self::with_binary(binary, config.base_url.clone()))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the Ollama server answers on `/api/tags`
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(AdvisorError::InstallerUnavailable(format!(
                "Ollama at {} answered with status {}",
                self.base_url,
                response.status()
            ))),
            Err(e) if e.is_connect() || e.is_timeout() => {
                Err(AdvisorError::InstallerUnavailable(format!(
                    "Ollama is not running at {}. Start the Ollama app or run 'ollama serve'",
                    self.base_url
                )))
            }
            Err(e) => Err(AdvisorError::Http(e)),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.env("OLLAMA_HOST", &self.base_url);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> AdvisorError {
        AdvisorError::InstallerUnavailable(format!(
            "failed to run {}: {}",
            self.binary.display(),
            e
        ))
    }
}

impl ModelRunner for OllamaCli {
    fn pull(&self, name: &str) -> Result<()> {
        tracing::info!("Pulling {}", name);
        let status = self
            .command()
            .args(["pull", name])
            .status()
            .map_err(|e| self.spawn_error(e))?;
        if status.success() {
            Ok(())
        } else {
            Err(AdvisorError::PullFailed {
                model: name.to_string(),
                code: status.code().unwrap_or(-1),
            })
        }
    }

    fn list_installed(&self) -> Result<Vec<String>> {
        let output = self
            .command()
            .arg("list")
            .stderr(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(AdvisorError::InstallerUnavailable(format!(
                "'{} list' exited with {}",
                self.binary.display(),
                output.status
            )));
        }
        Ok(parse_list_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn create(&self, name: &str, modelfile: &Path) -> Result<()> {
        tracing::info!("Creating {} from {}", name, modelfile.display());
        let status = self
            .command()
            .arg("create")
            .arg(name)
            .arg("-f")
            .arg(modelfile)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        if status.success() {
            Ok(())
        } else {
            Err(AdvisorError::ProfileFailed {
                model: name.to_string(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}

/// Parse `ollama list`: a header row, then the model name in column one
pub fn parse_list_output(output: &str) -> Vec<String> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("NAME"))
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Resolve a binary name to a path: explicit paths are taken as-is,
/// otherwise ask `which`/`where`.
pub fn find_binary(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let cmd = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };

    let output = Command::new(cmd).arg(name).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| PathBuf::from(line.trim()))
        .find(|path| path.exists())
}
