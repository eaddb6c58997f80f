// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model catalog loader
//!
//! Loads model descriptors from:
//! 1. Built-in defaults (always available)
//! 2. A CSV override file (`name,min_gb,rec_gb,context,description`)
//!
//! An override replaces the defaults entirely; it is never merged.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{AdvisorError, Result};

use super::schema::ModelDescriptor;

/// Expected CSV header, in order
pub const CSV_HEADER: [&str; 5] = ["name", "min_gb", "rec_gb", "context", "description"];

/// Where the active catalog came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    BuiltIn,
    File(PathBuf),
    /// Parsed from text handed in by the caller
    Inline,
}

/// Ordered, read-only model catalog
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
    source: CatalogSource,
}

impl ModelCatalog {
    /// Catalog with the built-in defaults
    pub fn with_defaults() -> Self {
        Self {
            models: default_models(),
            source: CatalogSource::BuiltIn,
        }
    }

    /// Resolve the catalog for this run.
    ///
    /// An explicit path beats `settings.catalog_path`, which beats the
    /// defaults. A configured file that is missing or malformed is an error;
    /// callers abort before matching.
    pub fn load(settings: &Settings, explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| settings.catalog_path.clone());

        match path {
            Some(path) => Self::from_csv_path(&path),
            None => Ok(Self::with_defaults()),
        }
    }

    /// Load a catalog from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AdvisorError::catalog(
                0,
                format!("catalog file not found: {}", path.display()),
            ));
        }
        let content = std::fs::read_to_string(path)?;
        let models = parse_csv(&content)?;
        tracing::debug!(
            "Loaded {} catalog entries from {}",
            models.len(),
            path.display()
        );
        Ok(Self {
            models,
            source: CatalogSource::File(path.to_path_buf()),
        })
    }

    /// Parse a catalog from CSV text
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Ok(Self {
            models: parse_csv(content)?,
            source: CatalogSource::Inline,
        })
    }

    /// All entries in catalog order
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Find an entry by exact name
    pub fn find(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Entry with the lowest minimum requirement (first wins on ties)
    pub fn smallest(&self) -> Option<&ModelDescriptor> {
        self.models.iter().min_by_key(|m| (m.min_gb, m.rec_gb))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Serialize back to the CSV override format
    pub fn to_csv(&self) -> String {
        let mut out = CSV_HEADER.join(",");
        out.push('\n');
        for m in &self.models {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                m.name, m.min_gb, m.rec_gb, m.context, m.description
            ));
        }
        out
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parse the CSV override format. Line numbers in errors are 1-based.
fn parse_csv(content: &str) -> Result<Vec<ModelDescriptor>> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| AdvisorError::catalog(1, "catalog is empty"))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns != CSV_HEADER {
        return Err(AdvisorError::catalog(
            header_line,
            format!("expected header '{}', got '{}'", CSV_HEADER.join(","), header),
        ));
    }

    let mut models = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != CSV_HEADER.len() {
            return Err(AdvisorError::catalog(
                line_no,
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }

        let descriptor = ModelDescriptor {
            name: fields[0].to_string(),
            min_gb: parse_number(line_no, "min_gb", fields[1])?,
            rec_gb: parse_number(line_no, "rec_gb", fields[2])?,
            context: parse_number(line_no, "context", fields[3])?,
            description: fields[4].to_string(),
        };
        descriptor
            .validate()
            .map_err(|reason| AdvisorError::catalog(line_no, reason))?;
        models.push(descriptor);
    }

    if models.is_empty() {
        return Err(AdvisorError::catalog(header_line, "catalog has no entries"));
    }

    Ok(models)
}

fn parse_number(line: usize, field: &str, raw: &str) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| {
        AdvisorError::catalog(
            line,
            format!("{} must be a non-negative integer, got '{}'", field, raw),
        )
    })
}

/// Built-in catalog, largest family members first
fn default_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("qwen2.5-coder:32b", 20, 24, 32768)
            .with_description("Best open coding model that fits a single 24GB GPU"),
        ModelDescriptor::new("deepseek-coder-v2:16b", 10, 16, 163840)
            .with_description("MoE coding model with a very long context"),
        ModelDescriptor::new("qwen2.5-coder:14b", 12, 16, 32768)
            .with_description("Great balance for coding tasks"),
        ModelDescriptor::new("codellama:13b", 9, 12, 16384)
            .with_description("Balanced Code Llama"),
        ModelDescriptor::new("deepseek-coder:6.7b", 5, 8, 16384)
            .with_description("Efficient coding model"),
        ModelDescriptor::new("codellama:7b", 5, 8, 16384).with_description("Compact coding model"),
        ModelDescriptor::new("qwen2.5-coder:7b", 5, 6, 32768)
            .with_description("Good for laptops with discrete GPU"),
        ModelDescriptor::new("qwen2.5-coder:3b", 2, 4, 32768)
            .with_description("Lightweight for older hardware"),
        ModelDescriptor::new("qwen2.5-coder:1.5b", 2, 3, 32768)
            .with_description("Minimal and runs almost anywhere"),
        ModelDescriptor::new("deepseek-coder:1.3b", 2, 3, 16384)
            .with_description("Ultra-lightweight coding"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "name,min_gb,rec_gb,context,description
tiny:1b,2,3,8192,Tiny model
mid:7b,5,6,32768,Mid model
";

    #[test]
    fn test_defaults_hold_invariants() {
        let catalog = ModelCatalog::with_defaults();
        assert!(!catalog.is_empty());
        for model in catalog.models() {
            assert!(model.validate().is_ok(), "{} is invalid", model.name);
            assert!(model.min_gb >= 2, "{} has min below 2GB", model.name);
            assert!(
                !model.description.contains(','),
                "{} description would break the CSV row",
                model.name
            );
        }
        assert_eq!(catalog.source(), &CatalogSource::BuiltIn);
    }

    #[test]
    fn test_parse_valid_csv() {
        let catalog = ModelCatalog::from_csv_str(VALID).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.models()[0].name, "tiny:1b");
        assert_eq!(catalog.models()[1].context, 32768);
        assert_eq!(catalog.models()[1].description, "Mid model");
        assert_eq!(catalog.source(), &CatalogSource::Inline);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_crlf() {
        let csv = "name,min_gb,rec_gb,context,description\r\n\r\nx:1b,2,3,4096,X\r\n";
        let catalog = ModelCatalog::from_csv_str(csv).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.models()[0].description, "X");
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let err = ModelCatalog::from_csv_str("name,min,rec,ctx,desc\nx:1b,2,3,4096,X\n")
            .unwrap_err();
        assert!(matches!(err, AdvisorError::CatalogValidation { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_extra_field() {
        let csv = "name,min_gb,rec_gb,context,description\nx:1b,2,3,4096,has, comma\n";
        let err = ModelCatalog::from_csv_str(csv).unwrap_err();
        match err {
            AdvisorError::CatalogValidation { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("6"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_zero_rec() {
        let csv = "name,min_gb,rec_gb,context,description\nx:1b,0,0,4096,X\n";
        let err = ModelCatalog::from_csv_str(csv).unwrap_err();
        assert!(err.to_string().contains("rec_gb"));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let csv = "name,min_gb,rec_gb,context,description\nx:1b,two,3,4096,X\n";
        let err = ModelCatalog::from_csv_str(csv).unwrap_err();
        assert!(err.to_string().contains("min_gb"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(ModelCatalog::from_csv_str("").is_err());
        assert!(ModelCatalog::from_csv_str("name,min_gb,rec_gb,context,description\n").is_err());
    }

    #[test]
    fn test_csv_roundtrip_of_defaults() {
        let catalog = ModelCatalog::with_defaults();
        let reparsed = ModelCatalog::from_csv_str(&catalog.to_csv()).unwrap();
        assert_eq!(reparsed.models(), catalog.models());
    }

    #[test]
    fn test_find_and_smallest() {
        let catalog = ModelCatalog::with_defaults();
        assert!(catalog.find("qwen2.5-coder:7b").is_some());
        assert!(catalog.find("nope:1b").is_none());
        assert_eq!(catalog.smallest().unwrap().name, "qwen2.5-coder:1.5b");
    }

    #[test]
    fn test_load_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, VALID).unwrap();

        let settings = Settings::default();
        let catalog = ModelCatalog::load(&settings, Some(path.as_path())).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.source(), &CatalogSource::File(path));
    }

    #[test]
    fn test_load_uses_settings_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, VALID).unwrap();

        let settings = Settings {
            catalog_path: Some(path),
            ..Settings::default()
        };
        let catalog = ModelCatalog::load(&settings, None).unwrap();
        assert_eq!(catalog.models()[0].name, "tiny:1b");
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let settings = Settings::default();
        let missing = PathBuf::from("/definitely/not/here/catalog.csv");
        let err = ModelCatalog::load(&settings, Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, AdvisorError::CatalogValidation { .. }));
    }

    #[test]
    fn test_load_defaults_without_override() {
        let catalog = ModelCatalog::load(&Settings::default(), None).unwrap();
        assert_eq!(catalog.len(), ModelCatalog::with_defaults().len());
    }
}
