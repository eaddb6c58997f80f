// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Local model runner integration
//!
//! The advisor only needs three things from a runner: fetch a model, list
//! what is already installed, and build a model from a profile file.

pub mod modelfile;
pub mod ollama;

use std::path::Path;

use crate::error::Result;

pub use modelfile::{optimized_model_name, render_modelfile, write_modelfile};
pub use ollama::OllamaCli;

/// Package-manager style operations on local models
#[cfg_attr(test, mockall::automock)]
pub trait ModelRunner {
    /// Download a model. Non-zero exit maps to `PullFailed`.
    fn pull(&self, name: &str) -> Result<()>;

    /// Names of installed models, as the runner prints them
    fn list_installed(&self) -> Result<Vec<String>>;

    /// Build `name` from a profile file. Non-zero exit maps to `ProfileFailed`.
    fn create(&self, name: &str, modelfile: &Path) -> Result<()>;

    /// Whether `name` (or `name:latest` for untagged names) is installed
    fn is_installed(&self, name: &str) -> Result<bool> {
        let installed = self.list_installed()?;
        Ok(installed_matches(&installed, name))
    }
}

/// Match a model name against a runner listing, treating an untagged name
/// as `:latest`
pub fn installed_matches(installed: &[String], name: &str) -> bool {
    let wanted = if name.contains(':') {
        name.to_string()
    } else {
        format!("{}:latest", name)
    };
    installed.iter().any(|n| n == name || *n == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_matches_exact() {
        let installed = vec!["qwen2.5-coder:7b".to_string(), "phi3:latest".to_string()];
        assert!(installed_matches(&installed, "qwen2.5-coder:7b"));
        assert!(!installed_matches(&installed, "qwen2.5-coder:14b"));
    }

    #[test]
    fn test_installed_matches_latest() {
        let installed = vec!["phi3:latest".to_string()];
        assert!(installed_matches(&installed, "phi3"));
        assert!(installed_matches(&installed, "phi3:latest"));
        assert!(!installed_matches(&installed, "phi3:mini"));
    }

    struct ListingRunner(Vec<String>);

    impl ModelRunner for ListingRunner {
        fn pull(&self, _name: &str) -> Result<()> {
            Ok(())
        }

        fn list_installed(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }

        fn create(&self, _name: &str, _modelfile: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_is_installed_default_method() {
        let runner = ListingRunner(vec!["codellama:7b".to_string()]);
        assert!(runner.is_installed("codellama:7b").unwrap());
        assert!(!runner.is_installed("codellama:13b").unwrap());
    }
}
