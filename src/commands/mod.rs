// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations

pub mod advise;
pub mod catalog;
pub mod modelfile;
pub mod scan;

pub use scan::{assess, Assessment};
