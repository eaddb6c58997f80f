// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware detection and memory budgeting
//!
//! The probe is the only platform-aware part of modelfit. Everything
//! downstream works on a [`ResourceProfile`] and never branches on OS.

pub mod detector;
pub mod gpu;
pub mod resources;
pub mod vram_table;

pub use detector::*;
pub use gpu::{GpuInfo, GpuProbe, GpuVendor, VramSource};
pub use resources::*;
