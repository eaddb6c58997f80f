// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for modelfit
//!
//! Loads settings from ~/.modelfit/settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod io;
mod validation;

/// Main settings structure, stored in ~/.modelfit/settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// CSV catalog used instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Where optimized profiles are written (default: ~/.modelfit/profiles)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    /// Model runner (Ollama) settings
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Coding assistant launched after a model is chosen
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Hardware probe overrides
    #[serde(default)]
    pub hardware: HardwareConfig,
}

/// Model runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Binary name or path
    #[serde(default = "default_runner_binary")]
    pub binary: String,

    /// Base URL of the runner's HTTP API
    #[serde(default = "default_runner_base_url")]
    pub base_url: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: default_runner_binary(),
            base_url: default_runner_base_url(),
        }
    }
}

/// Coding assistant configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Command used to start the assistant
    #[serde(default = "default_assistant_command")]
    pub command: String,

    /// Flag that takes the model argument
    #[serde(default = "default_model_flag")]
    pub model_flag: String,

    /// Prefix the assistant expects before a local model name
    #[serde(default = "default_model_prefix")]
    pub model_prefix: String,

    /// Arguments always passed to the assistant
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Program and arguments that install the assistant
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            command: default_assistant_command(),
            model_flag: default_model_flag(),
            model_prefix: default_model_prefix(),
            extra_args: Vec::new(),
            install_command: default_install_command(),
        }
    }
}

/// Hardware probe overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// Skip GPU detection and assume this much VRAM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram_override_gb: Option<u32>,
}

fn default_runner_binary() -> String {
    "ollama".to_string()
}

fn default_runner_base_url() -> String {
    crate::runner::ollama::DEFAULT_OLLAMA_URL.to_string()
}

fn default_assistant_command() -> String {
    "aider".to_string()
}

fn default_model_flag() -> String {
    "--model".to_string()
}

fn default_model_prefix() -> String {
    "ollama/".to_string()
}

fn default_install_command() -> Vec<String> {
    ["python3", "-m", "pip", "install", "aider-install"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(settings.catalog_path.is_none());
        assert!(settings.profile_dir.is_none());
        assert_eq!(settings.runner.binary, "ollama");
        assert_eq!(settings.runner.base_url, "http://localhost:11434");
        assert!(settings.hardware.vram_override_gb.is_none());
    }

    #[test]
    fn test_assistant_config_default() {
        let config = AssistantConfig::default();
        assert_eq!(config.command, "aider");
        assert_eq!(config.model_flag, "--model");
        assert_eq!(config.model_prefix, "ollama/");
        assert!(config.extra_args.is_empty());
        assert_eq!(
            config.install_command,
            vec!["python3", "-m", "pip", "install", "aider-install"]
        );
    }

    #[test]
    fn test_settings_load_from_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_load_written_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.hardware.vram_override_gb = Some(12);
        settings.assistant.extra_args = vec!["--no-auto-commits".to_string()];
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_settings_partial_json() {
        let json = r#"{"runner": {"base_url": "http://gpu-box:11434"}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.runner.base_url, "http://gpu-box:11434");
        assert_eq!(settings.runner.binary, "ollama");
        assert_eq!(settings.assistant.command, "aider");
    }

    #[test]
    fn test_load_ignores_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"future_key": 7, "runner": {"binary": "/opt/ollama/bin/ollama"}}"#)
            .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.runner.binary, "/opt/ollama/bin/ollama");
    }

    #[test]
    fn test_default_path() {
        let path = Settings::default_path();
        assert!(path.ends_with("settings.json"));
    }

    #[test]
    fn test_profiles_dir_respects_setting() {
        let settings = Settings {
            profile_dir: Some(PathBuf::from("/tmp/profiles")),
            ..Settings::default()
        };
        assert_eq!(settings.profiles_dir(), PathBuf::from("/tmp/profiles"));
        assert!(Settings::default().profiles_dir().ends_with("profiles"));
    }
}
