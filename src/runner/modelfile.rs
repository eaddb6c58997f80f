// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Optimized model profile (Ollama Modelfile)
//!
//! The template is fixed: only the base model and context size vary, so the
//! output for a given pair is byte-for-byte stable.

use std::path::{Path, PathBuf};

use crate::error::Result;

pub const NUM_BATCH: u32 = 512;
/// Offload every layer; Ollama clamps this to the model's layer count
pub const NUM_GPU_ALL: u32 = 999;
pub const NUM_THREAD: u32 = 8;
pub const TEMPERATURE: &str = "0.2";
pub const TOP_P: &str = "0.95";
pub const TOP_K: u32 = 40;

pub const SYSTEM_PROMPT: &str = "You are an expert software engineer working inside the user's repository. \
Write correct, idiomatic code that matches the surrounding style. \
Make focused changes, keep existing behavior unless asked, and explain your reasoning briefly.";

/// Render the profile for `base_model` with a `context` token window
pub fn render_modelfile(base_model: &str, context: u32) -> String {
    format!(
        "FROM {base_model}\n\
PARAMETER num_ctx {context}\n\
PARAMETER num_batch {NUM_BATCH}\n\
PARAMETER num_gpu {NUM_GPU_ALL}\n\
PARAMETER num_thread {NUM_THREAD}\n\
PARAMETER temperature {TEMPERATURE}\n\
PARAMETER top_p {TOP_P}\n\
PARAMETER top_k {TOP_K}\n\
SYSTEM \"\"\"{SYSTEM_PROMPT}\"\"\"\n"
    )
}

/// Name for the model built from the profile, e.g. `qwen2.5-coder-7b-optimized`
pub fn optimized_model_name(base_model: &str) -> String {
    format!("{}-optimized", sanitize(base_model))
}

/// Write the profile into `dir` and return its path
pub fn write_modelfile(dir: &Path, base_model: &str, context: u32) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("Modelfile.{}", sanitize(base_model)));
    std::fs::write(&path, render_modelfile(base_model, context))?;
    tracing::info!("Wrote optimized profile to {}", path.display());
    Ok(path)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' | '/' | '\\' | ' ' => '-',
            other => other,
        })
        .collect()
}
