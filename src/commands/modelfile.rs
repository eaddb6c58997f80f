// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Print or write an optimized profile file

use crate::cli::args::ModelfileArgs;
use crate::error::{AdvisorError, Result};
use crate::models::ModelCatalog;
use crate::runner::{render_modelfile, write_modelfile};

/// Context window for `args`: explicit flag, else the catalog entry's
pub fn resolve_context(args: &ModelfileArgs, catalog: &ModelCatalog) -> Result<u32> {
    if let Some(context) = args.context {
        if context == 0 {
            return Err(AdvisorError::InvalidInput(
                "--context must be greater than zero".to_string(),
            ));
        }
        return Ok(context);
    }

    catalog
        .find(&args.model)
        .map(|m| m.context)
        .ok_or_else(|| {
            AdvisorError::InvalidInput(format!(
                "'{}' is not in the catalog; pass --context explicitly",
                args.model
            ))
        })
}

/// Execute the modelfile command
pub fn execute(args: &ModelfileArgs, catalog: &ModelCatalog) -> Result<()> {
    let context = resolve_context(args, catalog)?;
    match &args.output {
        Some(dir) => {
            let path = write_modelfile(dir, &args.model, context)?;
            println!("{}", path.display());
        }
        None => print!("{}", render_modelfile(&args.model, context)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(model: &str, context: Option<u32>) -> ModelfileArgs {
        ModelfileArgs {
            model: model.to_string(),
            context,
            output: None,
        }
    }

    #[test]
    fn test_context_from_catalog() {
        let catalog = ModelCatalog::with_defaults();
        assert_eq!(
            resolve_context(&args("codellama:13b", None), &catalog).unwrap(),
            16384
        );
    }

    #[test]
    fn test_explicit_context_wins() {
        let catalog = ModelCatalog::with_defaults();
        assert_eq!(
            resolve_context(&args("codellama:13b", Some(4096)), &catalog).unwrap(),
            4096
        );
        assert_eq!(
            resolve_context(&args("not-in-catalog:1b", Some(2048)), &catalog).unwrap(),
            2048
        );
    }

    #[test]
    fn test_unknown_model_without_context() {
        let catalog = ModelCatalog::with_defaults();
        let err = resolve_context(&args("mystery:1b", None), &catalog).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_context_rejected() {
        let catalog = ModelCatalog::with_defaults();
        assert!(resolve_context(&args("codellama:13b", Some(0)), &catalog).is_err());
    }

    #[test]
    fn test_execute_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ModelfileArgs {
            model: "qwen2.5-coder:7b".to_string(),
            context: None,
            output: Some(dir.path().to_path_buf()),
        };
        execute(&args, &ModelCatalog::with_defaults()).unwrap();
        let written = std::fs::read_to_string(dir.path().join("Modelfile.qwen2.5-coder-7b")).unwrap();
        assert!(written.contains("PARAMETER num_ctx 32768"));
    }
}
