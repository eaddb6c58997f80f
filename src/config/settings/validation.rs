// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{AdvisorError, Result};

use super::Settings;

impl Settings {
    /// Reject settings that would only fail later in a confusing way.
    pub fn validate(&self) -> Result<()> {
        if self.runner.binary.trim().is_empty() {
            return Err(AdvisorError::Config("runner.binary is empty".to_string()));
        }

        let url = self.runner.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AdvisorError::Config(format!(
                "runner.base_url must start with http:// or https://, got '{}'",
                url
            )));
        }

        if self.assistant.command.trim().is_empty() {
            return Err(AdvisorError::Config("assistant.command is empty".to_string()));
        }

        if self.hardware.vram_override_gb == Some(0) {
            tracing::warn!("hardware.vram_override_gb is 0; only CPU-sized models will match");
        }

        Ok(())
    }
}
