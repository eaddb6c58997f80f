// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model catalog
//!
//! An ordered list of local model variants with their memory requirements.
//!
//! ## Sources
//!
//! The catalog is loaded from:
//! 1. Built-in defaults (always available)
//! 2. A CSV override file, either `--catalog <path>` or `catalog_path` in
//!    `~/.modelfit/settings.json`
//!
//! ## Override format
//!
//! ```text
//! name,min_gb,rec_gb,context,description
//! qwen2.5-coder:7b,5,6,32768,Good for laptops with discrete GPU
//! ```
//!
//! Descriptions may not contain commas. Every row must satisfy
//! `0 < rec_gb` and `min_gb <= rec_gb`.

pub mod loader;
pub mod schema;

pub use loader::{CatalogSource, ModelCatalog, CSV_HEADER};
pub use schema::ModelDescriptor;
