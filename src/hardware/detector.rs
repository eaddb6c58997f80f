// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! System hardware detection and profiling

use serde::{Deserialize, Serialize};
use sysinfo::System;

use super::gpu::{platform_gpu_probe, GpuInfo, GpuProbe, GpuVendor, VramSource};
use super::vram_table::INTEGRATED_VRAM_GB;
use crate::error::Result;

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// CPU architecture classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuArchitecture {
    X86_64,
    ARM64,
    Other,
}

impl CpuArchitecture {
    /// Detect the current CPU architecture
    pub fn detect() -> Self {
        match std::env::consts::ARCH {
            "x86_64" | "amd64" => CpuArchitecture::X86_64,
            "aarch64" | "arm64" => CpuArchitecture::ARM64,
            _ => CpuArchitecture::Other,
        }
    }
}

/// GPU vendor flags consumed by the advisor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuFlags {
    pub has_nvidia: bool,
    pub has_amd: bool,
    pub is_unified_memory: bool,
}

/// Raw probe output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Total system RAM in GB
    pub total_ram_gb: u32,
    /// Estimated usable VRAM in GB
    pub vram_gb: u32,
    pub gpu: GpuFlags,
    pub gpu_name: Option<String>,
    pub vram_source: VramSource,
    pub cpu_brand: String,
    pub cpu_cores: usize,
    pub architecture: CpuArchitecture,
}

impl ProbeReport {
    /// Report for a machine with the given RAM and a discrete GPU
    pub fn new(total_ram_gb: u32, vram_gb: u32) -> Self {
        Self {
            total_ram_gb,
            vram_gb,
            gpu: GpuFlags::default(),
            gpu_name: None,
            vram_source: VramSource::Reported,
            cpu_brand: "Unknown CPU".to_string(),
            cpu_cores: 0,
            architecture: CpuArchitecture::detect(),
        }
    }

    /// Builder: mark as a unified-memory machine
    pub fn unified(mut self) -> Self {
        self.gpu.is_unified_memory = true;
        self.vram_source = VramSource::Unified;
        self.vram_gb = self.total_ram_gb;
        self
    }
}

/// Anything that can describe the host's memory capacity
#[cfg_attr(test, mockall::automock)]
pub trait HardwareProbe {
    fn probe(&self) -> Result<ProbeReport>;
}

/// Probe backed by sysinfo for RAM/CPU and a platform GPU probe
pub struct SystemProbe {
    gpu: Box<dyn GpuProbe>,
    vram_override_gb: Option<u32>,
}

impl SystemProbe {
    /// Probe for the current platform
    pub fn new() -> Self {
        Self {
            gpu: platform_gpu_probe(),
            vram_override_gb: None,
        }
    }

    /// Probe with a specific GPU strategy
    pub fn with_gpu_probe(gpu: Box<dyn GpuProbe>) -> Self {
        Self {
            gpu,
            vram_override_gb: None,
        }
    }

    /// Builder: skip GPU detection and use a fixed VRAM figure
    pub fn with_vram_override(mut self, vram_gb: Option<u32>) -> Self {
        self.vram_override_gb = vram_gb;
        self
    }

    /// Round a byte count to the nearest whole GB.
    ///
    /// Kernels reserve part of physical memory, so a 16GB machine reports
    /// slightly less; rounding recovers the nominal size.
    pub fn bytes_to_gb(bytes: u64) -> u32 {
        ((bytes + BYTES_PER_GB / 2) / BYTES_PER_GB) as u32
    }

    fn resolve_gpu(&self) -> GpuInfo {
        if let Some(gb) = self.vram_override_gb {
            tracing::debug!("Using VRAM override of {}GB", gb);
            return GpuInfo {
                name: None,
                vendor: GpuVendor::Unknown,
                vram_gb: Some(gb),
                source: VramSource::Override,
                unified_memory: false,
            };
        }

        match self.gpu.detect() {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(
                    "{}; assuming integrated graphics with {}GB",
                    e,
                    INTEGRATED_VRAM_GB
                );
                GpuInfo {
                    name: None,
                    vendor: GpuVendor::Unknown,
                    vram_gb: None,
                    source: VramSource::Fallback,
                    unified_memory: false,
                }
            }
        }
    }

    /// Merge RAM and GPU findings into a report
    pub fn assemble(
        total_ram_gb: u32,
        cpu_brand: String,
        cpu_cores: usize,
        gpu: GpuInfo,
    ) -> ProbeReport {
        let vram_gb = if gpu.unified_memory {
            total_ram_gb
        } else {
            gpu.vram_gb.unwrap_or(INTEGRATED_VRAM_GB)
        };
        let vram_source = if gpu.vram_gb.is_none() && !gpu.unified_memory {
            VramSource::Fallback
        } else {
            gpu.source
        };

        ProbeReport {
            total_ram_gb,
            vram_gb,
            gpu: GpuFlags {
                has_nvidia: gpu.vendor == GpuVendor::Nvidia,
                has_amd: gpu.vendor == GpuVendor::Amd,
                is_unified_memory: gpu.unified_memory,
            },
            gpu_name: gpu.name,
            vram_source,
            cpu_brand,
            cpu_cores,
            architecture: CpuArchitecture::detect(),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareProbe for SystemProbe {
    fn probe(&self) -> Result<ProbeReport> {
        let sys = System::new_all();

        let total_ram_gb = Self::bytes_to_gb(sys.total_memory());
        let cpu_cores = sys.cpus().len();
        let cpu_brand = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .unwrap_or_else(|| "Unknown CPU".to_string());

        let gpu = self.resolve_gpu();
        let report = Self::assemble(total_ram_gb, cpu_brand, cpu_cores, gpu);
        tracing::debug!(
            ram_gb = report.total_ram_gb,
            vram_gb = report.vram_gb,
            source = ?report.vram_source,
            "hardware probe complete"
        );
        Ok(report)
    }
}
