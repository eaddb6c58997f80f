// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model catalog schema
//!
//! A catalog entry carries just enough to decide whether a model variant
//! fits in memory: the floor to run at all, the budget for full quality and
//! the native context window.

use serde::{Deserialize, Serialize};

/// A single model variant in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Runner identifier, including size and quantization tag (e.g. "qwen2.5-coder:7b")
    pub name: String,

    /// Minimum memory in GB to load the model at all
    pub min_gb: u32,

    /// Memory in GB for full-quality operation
    pub rec_gb: u32,

    /// Native context window in tokens
    pub context: u32,

    /// Short description
    #[serde(default)]
    pub description: String,
}

impl ModelDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, min_gb: u32, rec_gb: u32, context: u32) -> Self {
        Self {
            name: name.into(),
            min_gb,
            rec_gb,
            context,
            description: String::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Check the invariants a usable descriptor must hold.
    ///
    /// Returns a human-readable reason on failure; the loader turns this into
    /// a line-numbered validation error.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("model name is empty".to_string());
        }
        if self.rec_gb == 0 {
            return Err(format!("{}: rec_gb must be greater than zero", self.name));
        }
        if self.min_gb > self.rec_gb {
            return Err(format!(
                "{}: min_gb ({}) exceeds rec_gb ({})",
                self.name, self.min_gb, self.rec_gb
            ));
        }
        if self.context == 0 {
            return Err(format!("{}: context must be greater than zero", self.name));
        }
        if self.name.contains(',') || self.description.contains(',') {
            return Err(format!("{}: name and description must not contain commas", self.name));
        }
        Ok(())
    }
}
