// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Catalog matcher
//!
//! Classifies every catalog entry against the memory budget and suggests a
//! context window for the ones that fit. Pure: the same catalog and profile
//! always give the same, catalog-ordered result.

use serde::{Deserialize, Serialize};

use crate::hardware::ResourceProfile;
use crate::models::ModelDescriptor;

/// RAM beyond `rec_gb` needed before the full context window is advised
pub const CONTEXT_HEADROOM_GB: u32 = 4;

/// Fit classification for a single model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitTier {
    /// Fits the recommended budget
    Optimal,
    /// Fits the minimum but not the recommended budget
    Reduced,
    /// Below the minimum
    Unsupported,
}

impl FitTier {
    pub fn display_name(&self) -> &'static str {
        match self {
            FitTier::Optimal => "Optimal",
            FitTier::Reduced => "Reduced performance",
            FitTier::Unsupported => "Unsupported",
        }
    }
}

/// Advice attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitNote {
    FullContext,
    ReduceContextIfOom,
    SlowerPerformance,
}

impl std::fmt::Display for FitNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitNote::FullContext => write!(f, "full context usable"),
            FitNote::ReduceContextIfOom => write!(f, "reduce context if out-of-memory"),
            FitNote::SlowerPerformance => write!(f, "slower performance expected"),
        }
    }
}

/// A catalog entry that fits, with its suggested context window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub descriptor: ModelDescriptor,
    pub adjusted_context: u32,
    pub note: FitNote,
}

impl Recommendation {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Result of matching a catalog against a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub optimal: Vec<Recommendation>,
    pub reduced: Vec<Recommendation>,
}

impl MatchReport {
    /// Nothing fits: the "struggles with larger models" state
    pub fn is_empty(&self) -> bool {
        self.optimal.is_empty() && self.reduced.is_empty()
    }

    /// Optimal entries followed by reduced ones, each in catalog order
    pub fn candidates(&self) -> Vec<Recommendation> {
        self.optimal
            .iter()
            .chain(self.reduced.iter())
            .cloned()
            .collect()
    }
}

/// Tier for a single descriptor. Both boundaries are inclusive.
pub fn classify(descriptor: &ModelDescriptor, profile: &ResourceProfile) -> FitTier {
    let budget = profile.max_model_size_gb;
    if budget >= descriptor.rec_gb {
        FitTier::Optimal
    } else if budget >= descriptor.min_gb {
        FitTier::Reduced
    } else {
        FitTier::Unsupported
    }
}

/// Context window scaled by `budget / rec_gb`, floored.
///
/// Computed as `(context * budget) / rec_gb` in 64-bit integers, which is
/// the exact floor of the real-valued product and cannot drift at
/// fractional boundaries the way a float multiply can.
pub fn scaled_context(context: u32, budget_gb: u32, rec_gb: u32) -> u32 {
    if rec_gb == 0 {
        return context;
    }
    let scaled = u64::from(context) * u64::from(budget_gb) / u64::from(rec_gb);
    scaled.min(u64::from(context)) as u32
}

/// Partition the catalog into optimal and reduced recommendations
pub fn match_catalog(catalog: &[ModelDescriptor], profile: &ResourceProfile) -> MatchReport {
    let mut report = MatchReport::default();

    for descriptor in catalog {
        match classify(descriptor, profile) {
            FitTier::Optimal => {
                let (adjusted_context, note) = if profile.available_ram_gb
                    >= descriptor.rec_gb.saturating_add(CONTEXT_HEADROOM_GB)
                {
                    (descriptor.context, FitNote::FullContext)
                } else {
                    (descriptor.context / 2, FitNote::ReduceContextIfOom)
                };
                report.optimal.push(Recommendation {
                    descriptor: descriptor.clone(),
                    adjusted_context,
                    note,
                });
            }
            FitTier::Reduced => {
                report.reduced.push(Recommendation {
                    descriptor: descriptor.clone(),
                    adjusted_context: scaled_context(
                        descriptor.context,
                        profile.max_model_size_gb,
                        descriptor.rec_gb,
                    ),
                    note: FitNote::SlowerPerformance,
                });
            }
            FitTier::Unsupported => {
                tracing::trace!("{} needs at least {}GB", descriptor.name, descriptor.min_gb);
            }
        }
    }

    tracing::debug!(
        optimal = report.optimal.len(),
        reduced = report.reduced.len(),
        budget_gb = profile.max_model_size_gb,
        "catalog matched"
    );
    report
}
