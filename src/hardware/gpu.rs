// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-platform GPU detection
//!
//! Each probe shells out to the vendor or OS tool for its platform and
//! parses the text output. Parsers are free functions so they can be tested
//! on any host.

use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vram_table;
use crate::error::{AdvisorError, Result};

/// GPU vendor classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Unknown,
}

impl GpuVendor {
    /// Classify a vendor from an adapter name
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("nvidia") || lower.contains("geforce") || lower.contains("quadro") {
            GpuVendor::Nvidia
        } else if lower.contains("amd") || lower.contains("radeon") || lower.contains("ati ") {
            GpuVendor::Amd
        } else if lower.contains("intel") {
            GpuVendor::Intel
        } else if lower.contains("apple") {
            GpuVendor::Apple
        } else {
            GpuVendor::Unknown
        }
    }
}

/// How the VRAM figure was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VramSource {
    /// The vendor tool reported a number
    Reported,
    /// Looked up from the model-name table
    Table,
    /// GPU shares system RAM
    Unified,
    /// Nothing usable; integrated-graphics default
    Fallback,
    /// Pinned in settings
    Override,
}

/// Result of a GPU probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    pub name: Option<String>,
    pub vendor: GpuVendor,
    /// VRAM in GB, if known
    pub vram_gb: Option<u32>,
    pub source: VramSource,
    pub unified_memory: bool,
}

impl GpuInfo {
    fn discrete(name: &str, vram_gb: Option<u32>, source: VramSource) -> Self {
        Self {
            name: Some(name.to_string()),
            vendor: GpuVendor::from_name(name),
            vram_gb,
            source,
            unified_memory: false,
        }
    }

    /// Adapter whose memory is only known through the name table
    fn from_table(name: &str) -> Self {
        match vram_table::lookup(name) {
            Some(gb) => Self::discrete(name, Some(gb), VramSource::Table),
            None => Self::discrete(name, None, VramSource::Fallback),
        }
    }
}

/// Platform-specific GPU detection
pub trait GpuProbe: Send + Sync {
    fn detect(&self) -> Result<GpuInfo>;
}

/// Run a probe tool and return its stdout, mapping every failure to
/// `ProbeUnavailable`.
pub(crate) fn run_tool(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| AdvisorError::ProbeUnavailable(format!("{}: {}", program, e)))?;
    if !output.status.success() {
        return Err(AdvisorError::ProbeUnavailable(format!(
            "{} exited with {}",
            program, output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ==================== Parsers ====================

/// Parse `nvidia-smi --query-gpu=name,memory.total --format=csv,noheader,nounits`.
/// Memory is in MiB; the GPU with the most memory wins.
pub fn parse_nvidia_smi(output: &str) -> Option<GpuInfo> {
    output
        .lines()
        .filter_map(|line| {
            let (name, mib) = line.rsplit_once(',')?;
            let mib: u64 = mib.trim().parse().ok()?;
            Some((name.trim().to_string(), mib))
        })
        .max_by_key(|(_, mib)| *mib)
        .map(|(name, mib)| {
            let mut info = GpuInfo::discrete(&name, Some((mib / 1024) as u32), VramSource::Reported);
            info.vendor = GpuVendor::Nvidia;
            info
        })
}

/// Parse `lspci` output for display controllers
pub fn parse_lspci(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| {
            line.contains("VGA compatible controller")
                || line.contains("3D controller")
                || line.contains("Display controller")
        })
        .filter_map(|line| {
            // "01:00.0 VGA compatible controller: NVIDIA Corporation GA106 [GeForce RTX 3060]"
            let (_, rest) = line.split_once("controller:")?;
            Some(rest.trim().to_string())
        })
        .collect()
}

/// Pick the most capable adapter from lspci names: discrete vendors first
pub fn best_lspci_adapter(names: &[String]) -> Option<GpuInfo> {
    let mut adapters: Vec<GpuInfo> = names.iter().map(|n| GpuInfo::from_table(n)).collect();
    adapters.sort_by_key(|a| {
        let vendor_rank = match a.vendor {
            GpuVendor::Nvidia | GpuVendor::Amd => 0,
            GpuVendor::Intel => 1,
            _ => 2,
        };
        (vendor_rank, std::cmp::Reverse(a.vram_gb.unwrap_or(0)))
    });
    adapters.into_iter().next()
}

static VRAM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"VRAM \([^)]*\):\s*(\d+)\s*(GB|MB)").expect("static regex is valid")
});

static CHIPSET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chipset Model:\s*(.+)").expect("static regex is valid"));

/// Parse `system_profiler SPDisplaysDataType` on Intel Macs.
///
/// Each adapter block starts at its `Chipset Model` line and owns the VRAM
/// line that follows it; the adapter with the most memory wins.
pub fn parse_system_profiler(output: &str) -> Option<GpuInfo> {
    let chipsets: Vec<(usize, &str)> = CHIPSET_LINE
        .captures_iter(output)
        .filter_map(|c| Some((c.get(0)?.start(), c.get(1)?.as_str().trim())))
        .collect();

    chipsets
        .iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = chipsets.get(i + 1).map_or(output.len(), |(next, _)| *next);
            match block_vram_gb(&output[*start..end]) {
                Some(gb) => GpuInfo::discrete(name, Some(gb), VramSource::Reported),
                None => GpuInfo::from_table(name),
            }
        })
        .max_by_key(|info| info.vram_gb.unwrap_or(0))
}

fn block_vram_gb(block: &str) -> Option<u32> {
    let caps = VRAM_LINE.captures(block)?;
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    match caps.get(2)?.as_str() {
        "GB" => Some(amount),
        _ => Some(amount / 1024),
    }
}

/// Parse `Name|AdapterRAM` lines from Win32_VideoController.
///
/// AdapterRAM is a 32-bit byte count that tops out at 4GB, so a table hit
/// takes precedence over it.
pub fn parse_win32_video_controller(output: &str) -> Option<GpuInfo> {
    output
        .lines()
        .filter_map(|line| {
            let (name, ram) = line.trim().rsplit_once('|')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let reported = ram
                .trim()
                .parse::<u64>()
                .ok()
                .map(|bytes| (bytes / (1024 * 1024 * 1024)) as u32)
                .filter(|gb| *gb > 0);
            Some(match (vram_table::lookup(name), reported) {
                (Some(gb), _) => GpuInfo::discrete(name, Some(gb), VramSource::Table),
                (None, Some(gb)) => GpuInfo::discrete(name, Some(gb), VramSource::Reported),
                (None, None) => GpuInfo::discrete(name, None, VramSource::Fallback),
            })
        })
        .max_by_key(|info| info.vram_gb.unwrap_or(0))
}

// ==================== Probes ====================

/// Linux: nvidia-smi, then amdgpu sysfs, then lspci + name table
#[derive(Debug, Default)]
pub struct LinuxGpuProbe;

impl LinuxGpuProbe {
    fn amdgpu_sysfs_vram_gb(drm_root: &Path) -> Option<u32> {
        let entries = std::fs::read_dir(drm_root).ok()?;
        entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path().join("device/mem_info_vram_total");
                let bytes: u64 = std::fs::read_to_string(path).ok()?.trim().parse().ok()?;
                Some((bytes / (1024 * 1024 * 1024)) as u32)
            })
            .max()
    }
}

impl GpuProbe for LinuxGpuProbe {
    fn detect(&self) -> Result<GpuInfo> {
        if let Ok(out) = run_tool(
            "nvidia-smi",
            &[
                "--query-gpu=name,memory.total",
                "--format=csv,noheader,nounits",
            ],
        ) {
            if let Some(info) = parse_nvidia_smi(&out) {
                return Ok(info);
            }
        }

        let lspci_names = run_tool("lspci", &[])
            .map(|out| parse_lspci(&out))
            .unwrap_or_default();

        if let Some(gb) = Self::amdgpu_sysfs_vram_gb(Path::new("/sys/class/drm")) {
            let name = lspci_names
                .iter()
                .find(|n| GpuVendor::from_name(n) == GpuVendor::Amd)
                .cloned()
                .unwrap_or_else(|| "AMD GPU".to_string());
            let mut info = GpuInfo::discrete(&name, Some(gb), VramSource::Reported);
            info.vendor = GpuVendor::Amd;
            return Ok(info);
        }

        best_lspci_adapter(&lspci_names)
            .ok_or_else(|| AdvisorError::ProbeUnavailable("no display adapter found".to_string()))
    }
}

/// macOS: Apple Silicon is unified memory; Intel Macs use system_profiler
#[derive(Debug, Default)]
pub struct MacGpuProbe;

impl GpuProbe for MacGpuProbe {
    fn detect(&self) -> Result<GpuInfo> {
        if std::env::consts::ARCH == "aarch64" {
            return Ok(GpuInfo {
                name: Some("Apple Silicon".to_string()),
                vendor: GpuVendor::Apple,
                vram_gb: None,
                source: VramSource::Unified,
                unified_memory: true,
            });
        }

        let out = run_tool("system_profiler", &["SPDisplaysDataType"])?;
        parse_system_profiler(&out).ok_or_else(|| {
            AdvisorError::ProbeUnavailable("system_profiler reported no GPU".to_string())
        })
    }
}

/// Windows: nvidia-smi, then Win32_VideoController via PowerShell
#[derive(Debug, Default)]
pub struct WindowsGpuProbe;

impl GpuProbe for WindowsGpuProbe {
    fn detect(&self) -> Result<GpuInfo> {
        if let Ok(out) = run_tool(
            "nvidia-smi",
            &[
                "--query-gpu=name,memory.total",
                "--format=csv,noheader,nounits",
            ],
        ) {
            if let Some(info) = parse_nvidia_smi(&out) {
                return Ok(info);
            }
        }

        let out = run_tool(
            "powershell",
            &[
                "-NoProfile",
                "-Command",
                "Get-CimInstance Win32_VideoController | ForEach-Object { $_.Name + '|' + $_.AdapterRAM }",
            ],
        )?;
        parse_win32_video_controller(&out).ok_or_else(|| {
            AdvisorError::ProbeUnavailable("Win32_VideoController reported no GPU".to_string())
        })
    }
}

/// GPU probe for the platform this binary was built for
#[cfg(target_os = "macos")]
pub fn platform_gpu_probe() -> Box<dyn GpuProbe> {
    Box::new(MacGpuProbe)
}

/// GPU probe for the platform this binary was built for
#[cfg(target_os = "windows")]
pub fn platform_gpu_probe() -> Box<dyn GpuProbe> {
    Box::new(WindowsGpuProbe)
}

/// GPU probe for the platform this binary was built for
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn platform_gpu_probe() -> Box<dyn GpuProbe> {
    Box::new(LinuxGpuProbe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_from_name() {
        assert_eq!(
            GpuVendor::from_name("NVIDIA GeForce RTX 3060"),
            GpuVendor::Nvidia
        );
        assert_eq!(
            GpuVendor::from_name("Advanced Micro Devices, Inc. [AMD/ATI] Navi 31"),
            GpuVendor::Amd
        );
        assert_eq!(
            GpuVendor::from_name("Intel Corporation UHD Graphics 620"),
            GpuVendor::Intel
        );
        assert_eq!(GpuVendor::from_name("Matrox G200"), GpuVendor::Unknown);
    }

    #[test]
    fn test_parse_nvidia_smi_single() {
        let info = parse_nvidia_smi("NVIDIA GeForce RTX 3060, 12288\n").unwrap();
        assert_eq!(info.vram_gb, Some(12));
        assert_eq!(info.vendor, GpuVendor::Nvidia);
        assert_eq!(info.source, VramSource::Reported);
        assert_eq!(info.name.as_deref(), Some("NVIDIA GeForce RTX 3060"));
    }

    #[test]
    fn test_parse_nvidia_smi_picks_largest() {
        let out = "NVIDIA GeForce GTX 1650, 4096\nNVIDIA GeForce RTX 4090, 24564\n";
        let info = parse_nvidia_smi(out).unwrap();
        assert_eq!(info.vram_gb, Some(23));
        assert!(info.name.unwrap().contains("4090"));
    }

    #[test]
    fn test_parse_nvidia_smi_garbage() {
        assert!(parse_nvidia_smi("").is_none());
        assert!(parse_nvidia_smi("NVIDIA-SMI has failed").is_none());
    }

    #[test]
    fn test_parse_lspci() {
        let out = "00:00.0 Host bridge: Intel Corporation Device 9b61\n\
00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620\n\
01:00.0 3D controller: NVIDIA Corporation GA106 [GeForce RTX 3060]\n";
        let names = parse_lspci(out);
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], "Intel Corporation UHD Graphics 620");

        let best = best_lspci_adapter(&names).unwrap();
        assert_eq!(best.vendor, GpuVendor::Nvidia);
        assert_eq!(best.vram_gb, Some(12));
        assert_eq!(best.source, VramSource::Table);
    }

    #[test]
    fn test_lspci_integrated_only_has_no_vram() {
        let names = vec!["Intel Corporation UHD Graphics 620".to_string()];
        let best = best_lspci_adapter(&names).unwrap();
        assert_eq!(best.vendor, GpuVendor::Intel);
        assert_eq!(best.vram_gb, None);
        assert_eq!(best.source, VramSource::Fallback);
    }

    #[test]
    fn test_parse_system_profiler_gb() {
        let out = "Graphics/Displays:\n\n    AMD Radeon Pro 5500M:\n\n      Chipset Model: AMD Radeon Pro 5500M\n      Type: GPU\n      VRAM (Total): 8 GB\n";
        let info = parse_system_profiler(out).unwrap();
        assert_eq!(info.vram_gb, Some(8));
        assert_eq!(info.vendor, GpuVendor::Amd);
    }

    #[test]
    fn test_parse_system_profiler_mb() {
        let out = "      Chipset Model: Intel UHD Graphics 630\n      VRAM (Dynamic, Max): 1536 MB\n";
        let info = parse_system_profiler(out).unwrap();
        assert_eq!(info.vram_gb, Some(1));
        assert_eq!(info.vendor, GpuVendor::Intel);
    }

    #[test]
    fn test_parse_system_profiler_pairs_name_with_its_vram() {
        let out = "Graphics/Displays:\n\n    Intel UHD Graphics 630:\n\n      Chipset Model: Intel UHD Graphics 630\n      Type: GPU\n      VRAM (Dynamic, Max): 1536 MB\n\n    AMD Radeon Pro 5500M:\n\n      Chipset Model: AMD Radeon Pro 5500M\n      Type: GPU\n      VRAM (Total): 8 GB\n\n    Intel Iris Plus:\n\n      Chipset Model: Intel Iris Plus Graphics\n      VRAM (Dynamic, Max): 1536 MB\n";
        let info = parse_system_profiler(out).unwrap();
        assert_eq!(info.name.as_deref(), Some("AMD Radeon Pro 5500M"));
        assert_eq!(info.vram_gb, Some(8));
        assert_eq!(info.vendor, GpuVendor::Amd);
        assert_eq!(info.source, VramSource::Reported);
    }

    #[test]
    fn test_parse_system_profiler_empty() {
        assert!(parse_system_profiler("").is_none());
    }

    #[test]
    fn test_parse_win32_prefers_table_over_capped_adapter_ram() {
        let out = "NVIDIA GeForce RTX 3060|4293918720\r\nIntel(R) UHD Graphics 630|1073741824\r\n";
        let info = parse_win32_video_controller(out).unwrap();
        assert_eq!(info.vram_gb, Some(12));
        assert_eq!(info.source, VramSource::Table);
    }

    #[test]
    fn test_parse_win32_unknown_card_uses_adapter_ram() {
        let out = "Some Workstation GPU|2147483648\n";
        let info = parse_win32_video_controller(out).unwrap();
        assert_eq!(info.vram_gb, Some(2));
        assert_eq!(info.source, VramSource::Reported);
    }

    #[test]
    fn test_amdgpu_sysfs_reads_largest_card() {
        let dir = tempfile::tempdir().unwrap();
        for (card, bytes) in [("card0", 8u64 << 30), ("card1", 16u64 << 30)] {
            let device = dir.path().join(card).join("device");
            std::fs::create_dir_all(&device).unwrap();
            std::fs::write(device.join("mem_info_vram_total"), bytes.to_string()).unwrap();
        }
        assert_eq!(LinuxGpuProbe::amdgpu_sysfs_vram_gb(dir.path()), Some(16));
    }

    #[test]
    fn test_amdgpu_sysfs_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LinuxGpuProbe::amdgpu_sysfs_vram_gb(dir.path()), None);
    }
}
