// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Settings;

const SETTINGS_FILE: &str = "settings.json";

impl Settings {
    /// ~/.modelfit/settings.json, or under $MODELFIT_HOME when set
    pub fn default_path() -> PathBuf {
        Self::modelfit_home().join(SETTINGS_FILE)
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load and validate settings. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let settings: Settings = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// The modelfit home directory (~/.modelfit or $MODELFIT_HOME).
    pub fn modelfit_home() -> PathBuf {
        match std::env::var_os("MODELFIT_HOME") {
            Some(home) => PathBuf::from(home),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".modelfit"),
        }
    }

    /// Directory for optimized profile files.
    pub fn profiles_dir(&self) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| Self::modelfit_home().join("profiles"))
    }
}
