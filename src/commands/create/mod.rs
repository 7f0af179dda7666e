//! Implementation of the `clouduct create` command.
//!
//! Bridges the CLI surface to the generation pipeline: validate the
//! arguments, resolve the template from the registry, then hand a
//! [`GenerationRequest`] to the [`Generator`].
//!
//! # What `clouduct create NAME` produces
//!
//! 1. `NAME/` — the application skeleton, reseeded with the project values,
//!    plus the bundled `clouduct-deploy` helper
//! 2. `NAME-infra/` — the infrastructure skeleton, the bundled `clouduct-tf`
//!    wrapper, and the `terraform.env` provisioning config
//!
//! With `--execute` the staged `clouduct-tf apply` is run from `NAME-infra`;
//! without it the run stops after printing the plan notice.

mod validation;


use crate::cli::CreateArgs;
use crate::error::{CloudError, Result};
use crate::generate::{assets, GenerationRequest, Generator};
use crate::registry::TemplateRegistry;
use std::path::{Path, PathBuf};

use validation::*;

/// Execute the `clouduct create` command in the current directory.
pub fn cmd_create(args: CreateArgs) -> Result<()> {
    let workdir = std::env::current_dir().map_err(|e| {
        CloudError::UserError(format!("failed to resolve the current directory: {}", e))
    })?;
    let asset_roots = assets::default_asset_roots(&workdir);

    run_create(args, &workdir, asset_roots)
}

/// Run `create` with explicit working directory and asset roots.
pub(super) fn run_create(args: CreateArgs, workdir: &Path, asset_roots: Vec<PathBuf>) -> Result<()> {
    validate_project_name(&args.project_name)?;
    let tags = parse_tags(&args.tags)?;
    let seed_variables = parse_vars(&args.vars)?;

    let registry = TemplateRegistry::load(&args.templates_config)?;
    let template = registry.resolve(args.template.as_deref())?;

    let request = GenerationRequest {
        project_name: args.project_name,
        profile: args.profile,
        region: args.region,
        tags,
        seed_variables,
        execute: args.execute,
    };

    let mut generator = Generator::new(workdir, asset_roots);
    generator.run(template, &request)?;

    Ok(())
}
