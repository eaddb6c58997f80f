// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware and recommendation reports
//!
//! [`render_text`] builds the plain report; [`print_text`] adds colour on a
//! terminal. [`AdviceJson`] is the `--format json` document.

use std::fmt::Write as _;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};
use serde::Serialize;

use crate::error::Result;
use crate::hardware::{ProbeReport, ResourceProfile, VramSource};
use crate::matcher::{FitTier, MatchReport, Recommendation};
use crate::models::{CatalogSource, ModelCatalog};

/// Fallback line shown when nothing in the catalog fits
pub const STRUGGLES_MESSAGE: &str = "Your system struggles with larger models.";

/// Human readable catalog origin
pub fn describe_source(source: &CatalogSource) -> String {
    match source {
        CatalogSource::BuiltIn => "built-in".to_string(),
        CatalogSource::File(path) => path.display().to_string(),
        CatalogSource::Inline => "inline".to_string(),
    }
}

/// Suggestion printed in the fallback state
pub fn fallback_message(catalog: &ModelCatalog) -> String {
    match catalog.smallest() {
        Some(model) => format!(
            "{} The smallest catalog model is {} (needs at least {}GB); \
             expect it to be slow.",
            STRUGGLES_MESSAGE, model.name, model.min_gb
        ),
        None => STRUGGLES_MESSAGE.to_string(),
    }
}

fn vram_label(source: VramSource) -> &'static str {
    match source {
        VramSource::Reported => "reported by driver",
        VramSource::Table => "estimated from GPU name",
        VramSource::Unified => "unified memory",
        VramSource::Fallback => "assumed integrated graphics",
        VramSource::Override => "from settings",
    }
}

fn push_recommendation(out: &mut String, rec: &Recommendation) {
    let _ = writeln!(
        out,
        "  • {:<24} context {:>6}  ({})",
        rec.name(),
        rec.adjusted_context,
        rec.note
    );
}

/// Render the full text report
pub fn render_text(
    probe: &ProbeReport,
    profile: &ResourceProfile,
    matches: &MatchReport,
    catalog: &ModelCatalog,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Hardware ===");
    let _ = writeln!(out, "CPU: {} ({} cores)", probe.cpu_brand, probe.cpu_cores);
    let _ = writeln!(out, "RAM: {}GB", probe.total_ram_gb);
    let gpu = probe.gpu_name.as_deref().unwrap_or("unknown GPU");
    let _ = writeln!(
        out,
        "GPU: {} ({}GB, {})",
        gpu,
        probe.vram_gb,
        vram_label(probe.vram_source)
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "=== Memory Budget ===");
    let _ = writeln!(out, "Available RAM: {}GB", profile.available_ram_gb);
    let _ = writeln!(out, "Available VRAM: {}GB", profile.available_vram_gb);
    let _ = writeln!(
        out,
        "Max model size: {}GB{}",
        profile.max_model_size_gb,
        if profile.ram_bound() {
            " (limited by RAM)"
        } else {
            ""
        }
    );

    if matches.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", fallback_message(catalog));
        return out;
    }

    if !matches.optimal.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== {} ===", FitTier::Optimal.display_name());
        for rec in &matches.optimal {
            push_recommendation(&mut out, rec);
        }
    }

    if !matches.reduced.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== {} ===", FitTier::Reduced.display_name());
        for rec in &matches.reduced {
            push_recommendation(&mut out, rec);
        }
    }

    out
}

/// Print the text report, colouring section headers
pub fn print_text(
    probe: &ProbeReport,
    profile: &ResourceProfile,
    matches: &MatchReport,
    catalog: &ModelCatalog,
) -> Result<()> {
    let mut stdout = io::stdout();
    println!();
    for line in render_text(probe, profile, matches, catalog).lines() {
        let color = if line.starts_with("===") {
            Some(Color::Cyan)
        } else if line.starts_with(STRUGGLES_MESSAGE) {
            Some(Color::Yellow)
        } else {
            None
        };

        match color {
            Some(color) => {
                stdout.execute(SetForegroundColor(color))?;
                println!("{}", line);
                stdout.execute(ResetColor)?;
            }
            None => println!("{}", line),
        }
    }
    stdout.flush()?;
    Ok(())
}

/// One recommendation in the JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationJson {
    pub name: String,
    pub tier: FitTier,
    pub min_gb: u32,
    pub rec_gb: u32,
    pub context: u32,
    pub adjusted_context: u32,
    pub note: String,
}

impl RecommendationJson {
    fn new(rec: &Recommendation, tier: FitTier) -> Self {
        Self {
            name: rec.descriptor.name.clone(),
            tier,
            min_gb: rec.descriptor.min_gb,
            rec_gb: rec.descriptor.rec_gb,
            context: rec.descriptor.context,
            adjusted_context: rec.adjusted_context,
            note: rec.note.to_string(),
        }
    }
}

/// `--format json` document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceJson {
    pub generated_at: DateTime<Utc>,
    pub hardware: ProbeReport,
    pub profile: ResourceProfile,
    pub catalog_source: String,
    pub optimal: Vec<RecommendationJson>,
    pub reduced: Vec<RecommendationJson>,
    /// Set only in the fallback state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl AdviceJson {
    pub fn new(
        probe: &ProbeReport,
        profile: &ResourceProfile,
        matches: &MatchReport,
        catalog: &ModelCatalog,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            hardware: probe.clone(),
            profile: *profile,
            catalog_source: describe_source(catalog.source()),
            optimal: matches
                .optimal
                .iter()
                .map(|r| RecommendationJson::new(r, FitTier::Optimal))
                .collect(),
            reduced: matches
                .reduced
                .iter()
                .map(|r| RecommendationJson::new(r, FitTier::Reduced))
                .collect(),
            fallback: matches.is_empty().then(|| fallback_message(catalog)),
        }
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
