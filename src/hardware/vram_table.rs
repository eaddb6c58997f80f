// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Approximate VRAM by GPU model name
//!
//! Used when the vendor tooling cannot report memory (Windows AdapterRAM is a
//! 32-bit field, lspci has no memory column). Values are the common retail
//! configuration and are best-effort only.

/// Lowercase name fragment to VRAM in GB. Fragments match on word
/// boundaries, and more specific names come first so "rtx 4060 ti" wins
/// over "rtx 4060".
const VRAM_TABLE: &[(&str, u32)] = &[
    // NVIDIA data center / workstation
    ("h100", 80),
    ("a100", 40),
    ("rtx a6000", 48),
    ("rtx 6000", 48),
    ("rtx a5000", 24),
    ("rtx a4000", 16),
    ("rtx a2000", 6),
    ("rtx a1000", 8),
    // NVIDIA RTX 50
    ("rtx 5090", 32),
    ("rtx 5080", 16),
    ("rtx 5070 ti", 16),
    ("rtx 5070", 12),
    ("rtx 5060 ti", 16),
    ("rtx 5060", 8),
    // NVIDIA RTX 40
    ("rtx 4090", 24),
    ("rtx 4080", 16),
    ("rtx 4070 ti super", 16),
    ("rtx 4070 ti", 12),
    ("rtx 4070 super", 12),
    ("rtx 4070", 12),
    ("rtx 4060 ti", 8),
    ("rtx 4060", 8),
    // NVIDIA RTX 30
    ("rtx 3090", 24),
    ("rtx 3080 ti", 12),
    ("rtx 3080", 10),
    ("rtx 3070", 8),
    ("rtx 3060 ti", 8),
    ("rtx 3060", 12),
    ("rtx 3050", 8),
    // NVIDIA RTX 20 / GTX 16
    ("rtx 2080 ti", 11),
    ("rtx 2080", 8),
    ("rtx 2070", 8),
    ("rtx 2060", 6),
    ("gtx 1660", 6),
    ("gtx 1650", 4),
    ("gtx 1080 ti", 11),
    ("gtx 1080", 8),
    ("gtx 1070", 8),
    ("gtx 1060", 6),
    // AMD
    ("rx 7900 xtx", 24),
    ("rx 7900 xt", 20),
    ("rx 7800 xt", 16),
    ("rx 7700 xt", 12),
    ("rx 7600", 8),
    ("rx 6950 xt", 16),
    ("rx 6900 xt", 16),
    ("rx 6800", 16),
    ("rx 6700 xt", 12),
    ("rx 6600", 8),
    ("rx 580", 8),
    ("radeon pro w7900", 48),
    ("radeon pro w7800", 32),
    ("radeon vii", 16),
    // Intel discrete
    ("arc a770", 16),
    ("arc a750", 8),
    ("arc b580", 12),
];

/// Default for integrated graphics or unknown adapters
pub const INTEGRATED_VRAM_GB: u32 = 2;

/// Look up the approximate VRAM for a GPU model name
pub fn lookup(gpu_name: &str) -> Option<u32> {
    let name = gpu_name.to_lowercase();
    VRAM_TABLE
        .iter()
        .find(|(needle, _)| contains_word(&name, needle))
        .map(|(_, gb)| *gb)
}

/// `needle` occurs in `haystack` with no letter or digit glued to either end
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
