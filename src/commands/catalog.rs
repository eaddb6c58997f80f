// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! List the effective catalog

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::models::{ModelCatalog, ModelDescriptor};
use crate::report::describe_source;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogListing<'a> {
    source: String,
    models: &'a [ModelDescriptor],
}

/// Render the catalog as an aligned table
pub fn render_table(catalog: &ModelCatalog) -> String {
    let mut out = format!("Catalog: {}\n\n", describe_source(catalog.source()));
    out.push_str(&format!(
        "{:<24} {:>6} {:>6} {:>8}  {}\n",
        "NAME", "MIN GB", "REC GB", "CONTEXT", "DESCRIPTION"
    ));
    for m in catalog.models() {
        out.push_str(&format!(
            "{:<24} {:>6} {:>6} {:>8}  {}\n",
            m.name, m.min_gb, m.rec_gb, m.context, m.description
        ));
    }
    out
}

/// Execute the catalog command
pub fn execute(catalog: &ModelCatalog, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let listing = CatalogListing {
                source: describe_source(catalog.source()),
                models: catalog.models(),
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => print!("{}", render_table(catalog)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let table = render_table(&ModelCatalog::with_defaults());
        assert!(table.starts_with("Catalog: built-in"));
        assert!(table.contains("NAME"));
        assert!(table.contains("qwen2.5-coder:32b"));
        // header + title + blank + one row per entry
        assert_eq!(table.lines().count(), 3 + ModelCatalog::with_defaults().len());
    }
}
