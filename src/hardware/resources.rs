// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Memory budget derived from a probe report

use serde::{Deserialize, Serialize};

use super::detector::ProbeReport;

/// RAM held back for the operating system and other processes
pub const SYSTEM_RESERVE_GB: u32 = 4;

/// Memory budget for one advisor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProfile {
    pub total_ram_gb: u32,
    pub vram_gb: u32,
    /// `total_ram_gb - SYSTEM_RESERVE_GB`, never negative
    pub available_ram_gb: u32,
    pub available_vram_gb: u32,
    /// The binding constraint: `min(available_ram_gb, available_vram_gb)`
    pub max_model_size_gb: u32,
    pub unified_memory: bool,
}

impl ResourceProfile {
    /// Derive the budget from raw RAM/VRAM figures.
    ///
    /// On unified-memory machines the GPU draws from the same pool, so the
    /// VRAM budget equals the available RAM.
    pub fn new(total_ram_gb: u32, vram_gb: u32, unified_memory: bool) -> Self {
        let available_ram_gb = total_ram_gb.saturating_sub(SYSTEM_RESERVE_GB);
        let available_vram_gb = if unified_memory {
            available_ram_gb
        } else {
            vram_gb
        };

        Self {
            total_ram_gb,
            vram_gb,
            available_ram_gb,
            available_vram_gb,
            max_model_size_gb: available_ram_gb.min(available_vram_gb),
            unified_memory,
        }
    }

    pub fn from_report(report: &ProbeReport) -> Self {
        Self::new(
            report.total_ram_gb,
            report.vram_gb,
            report.gpu.is_unified_memory,
        )
    }

    /// Whether RAM rather than VRAM is the binding constraint
    pub fn ram_bound(&self) -> bool {
        self.available_ram_gb < self.available_vram_gb
    }
}
