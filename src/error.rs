// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for modelfit
//!
//! Fatal conditions (bad catalog, missing model runner) and recoverable ones
//! (probe failures, pull/launch failures) share one enum; callers decide
//! which variants abort the run.

use thiserror::Error;

/// Main error type for modelfit operations
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// A hardware probe tool is missing or produced unusable output
    #[error("Hardware probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// An external catalog file is malformed
    #[error("Invalid catalog (line {line}): {message}")]
    CatalogValidation { line: usize, message: String },

    /// The model runner binary is missing or its server is unreachable
    #[error("Model runner unavailable: {0}")]
    InstallerUnavailable(String),

    /// Pulling a model returned a non-zero exit status
    #[error("Failed to pull {model} (exit code {code})")]
    PullFailed { model: String, code: i32 },

    /// Building an optimized model from a profile file returned a non-zero exit status
    #[error("Failed to create optimized model {model} (exit code {code})")]
    ProfileFailed { model: String, code: i32 },

    /// The assistant tool could not be started or exited with an error
    #[error("Launch failed: {0}")]
    LaunchFailed(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AdvisorError {
    /// Build a catalog validation error for a 1-based line number
    pub fn catalog(line: usize, message: impl Into<String>) -> Self {
        AdvisorError::CatalogValidation {
            line,
            message: message.into(),
        }
    }

    /// Whether the interactive flow should report this error and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdvisorError::ProbeUnavailable(_)
                | AdvisorError::PullFailed { .. }
                | AdvisorError::ProfileFailed { .. }
                | AdvisorError::LaunchFailed(_)
        )
    }
}

/// Result type alias for modelfit operations
pub type Result<T> = std::result::Result<T, AdvisorError>;
