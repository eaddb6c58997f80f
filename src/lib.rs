// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! modelfit - pick a local coding model that fits your hardware.
//!
//! This crate exposes the pieces used by the `modelfit` CLI (`src/main.rs`).
//!
//! Architecture highlights:
//! - `hardware`: RAM/GPU probing and the memory budget derived from it
//! - `models`: model catalog (built-in or CSV) and descriptors
//! - `matcher`: pure catalog-against-budget classification
//! - `runner`, `launcher`: Ollama and coding-assistant process wrappers
//! - `selection`, `report`: user interaction and output rendering
//! - `commands`: the subcommands wiring it all together

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hardware;
pub mod launcher;
pub mod matcher;
pub mod models;
pub mod report;
pub mod runner;
pub mod selection;

pub use error::{AdvisorError, Result};
