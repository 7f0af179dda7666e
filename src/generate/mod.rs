//! The generation pipeline.
//!
//! [`Generator`] sequences the pipeline stages over one working directory:
//! fetch the application skeleton into the seed directory, reseed it,
//! promote it to its final project name, fetch the infrastructure skeleton,
//! stage the bundled helpers and write the provisioning config. Running the
//! provisioning tool itself is gated behind an explicit flag.
//!
//! Directory handling is deliberately destructive: fetches delete any
//! previous target before cloning, and promotion replaces any previous
//! application directory. Repeating a run therefore always starts from a
//! clean slate. On failure nothing is rolled back; partially generated
//! directories stay on disk for inspection.

pub mod assets;
pub mod fetch;
pub mod preflight;
pub mod reseed;
pub mod tfvars;


use crate::error::{CloudError, Result};
use crate::registry::Template;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory the application skeleton is cloned into before promotion.
pub const SEED_DIR: &str = ".clouduct-seed";

/// Helper staged into the application directory.
const DEPLOY_ASSET: &str = "clouduct-bin/clouduct-deploy";
/// Helper staged into the infrastructure directory.
const TF_ASSET: &str = "clouduct-bin/clouduct-tf";

/// Everything one generation run needs to know.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Project name, used as a directory name and as a substitution value.
    pub project_name: String,
    /// AWS profile exported to the provisioning tool, if any.
    pub profile: Option<String>,
    /// AWS region written into the provisioning config.
    pub region: String,
    /// Resource tags in command-line order.
    pub tags: Vec<(String, String)>,
    /// Extra substitution variables for the application skeleton.
    pub seed_variables: BTreeMap<String, String>,
    /// Whether to run `clouduct-tf apply` after generation.
    pub execute: bool,
}

/// Pipeline stages in execution order.
///
/// Every stage must complete before the next starts. The first failure is
/// terminal; the generator then stays at the last completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenState {
    Start,
    ApplicationFetched,
    Reseeded,
    InfrastructureFetched,
    Staged,
    Configured,
    Planned,
    Executed,
}

/// Sequences the generation pipeline over one working directory.
///
/// A generator is scoped to a single run: the working directory and asset
/// roots are fixed at construction and there is no other state. Two
/// concurrent runs must not share a `project_name` — they would race on the
/// seed directory and overwrite each other's output.
pub struct Generator {
    workdir: PathBuf,
    asset_roots: Vec<PathBuf>,
    state: GenState,
}

impl Generator {
    /// Create a generator rooted at `workdir`, staging assets from
    /// `asset_roots` (first match wins).
    pub fn new(workdir: impl Into<PathBuf>, asset_roots: Vec<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            asset_roots,
            state: GenState::Start,
        }
    }

    /// The stage the pipeline has reached.
    pub fn state(&self) -> GenState {
        self.state
    }

    /// Transient clone target for the application skeleton.
    pub fn seed_dir(&self) -> PathBuf {
        self.workdir.join(SEED_DIR)
    }

    /// Final application directory for `project_name`.
    pub fn application_dir(&self, project_name: &str) -> PathBuf {
        self.workdir.join(project_name)
    }

    /// Infrastructure directory for `project_name`.
    pub fn infra_dir(&self, project_name: &str) -> PathBuf {
        self.workdir.join(format!("{}-infra", project_name))
    }

    /// Run the whole pipeline for `template` and `request`.
    ///
    /// Returns the terminal state: [`GenState::Planned`] when `execute` is
    /// false, [`GenState::Executed`] after a successful provisioning run.
    pub fn run(&mut self, template: &Template, request: &GenerationRequest) -> Result<GenState> {
        preflight::check_ssh_identity(&[
            template.application.as_str(),
            template.infrastructure.as_str(),
        ])?;

        let seed_dir = self.seed_dir();
        let application_dir = self.application_dir(&request.project_name);
        let infra_dir = self.infra_dir(&request.project_name);

        println!("Fetching application template from {}", template.application);
        fetch::fetch(&template.application, &seed_dir)?;
        self.state = GenState::ApplicationFetched;

        let mut variables = request.seed_variables.clone();
        variables.insert("project_name".to_string(), request.project_name.clone());

        let report = reseed::reseed(&seed_dir, &variables)?;
        println!(
            "Seeded '{}' ({} file(s) rewritten, {} binary file(s) skipped)",
            request.project_name, report.files_rewritten, report.binaries_skipped
        );
        for (name, count) in &report.unresolved {
            eprintln!(
                "Warning: no value for placeholder '{{{{{}}}}}' ({} occurrence(s) left as-is)",
                name, count
            );
        }
        self.state = GenState::Reseeded;

        promote(&seed_dir, &application_dir)?;

        println!(
            "Fetching infrastructure template from {}",
            template.infrastructure
        );
        fetch::fetch(&template.infrastructure, &infra_dir)?;
        self.state = GenState::InfrastructureFetched;

        let deploy_path = assets::stage(&self.asset_roots, DEPLOY_ASSET, &application_dir)?;
        let tf_path = assets::stage(&self.asset_roots, TF_ASSET, &infra_dir)?;
        println!("Staged {} and {}", deploy_path.display(), tf_path.display());
        self.state = GenState::Staged;

        let entries = tfvars::entries(request)?;
        let config_path = tfvars::write_tfvars(&infra_dir, &entries)?;
        println!("Wrote {}", config_path.display());
        self.state = GenState::Configured;

        print_summary(request, &application_dir, &infra_dir, &entries);

        if request.execute {
            provision(&infra_dir, request)?;
            self.state = GenState::Executed;
        } else {
            self.state = GenState::Planned;
        }

        Ok(self.state)
    }
}

/// Promote the reseeded seed into its final project directory.
///
/// The seed's clone metadata is stripped first: generated projects start
/// without history. Any previous directory under the project name is
/// replaced.
fn promote(seed_dir: &Path, application_dir: &Path) -> Result<()> {
    let git_dir = seed_dir.join(".git");
    if git_dir.exists() {
        fs::remove_dir_all(&git_dir).map_err(|e| {
            CloudError::FetchError(format!("failed to strip '{}': {}", git_dir.display(), e))
        })?;
    }

    if application_dir.exists() {
        fs::remove_dir_all(application_dir).map_err(|e| {
            CloudError::FetchError(format!(
                "failed to remove existing '{}': {}",
                application_dir.display(),
                e
            ))
        })?;
    }

    fs::rename(seed_dir, application_dir).map_err(|e| {
        CloudError::FetchError(format!(
            "failed to move '{}' to '{}': {}",
            seed_dir.display(),
            application_dir.display(),
            e
        ))
    })
}

/// Print where everything landed and how to provision it.
fn print_summary(
    request: &GenerationRequest,
    application_dir: &Path,
    infra_dir: &Path,
    entries: &[(String, String)],
) {
    println!();
    println!("Generated project '{}':", request.project_name);
    println!("  Application:    {}", application_dir.display());
    println!("  Infrastructure: {}", infra_dir.display());
    if let Some(profile) = &request.profile {
        println!("  AWS profile:    {}", profile);
    }
    println!();
    println!("Provisioning config:");
    for (key, value) in entries {
        println!("  {}={}", key, value);
    }
    println!();
    if request.execute {
        println!("Running:");
    } else {
        println!("To provision the infrastructure, run:");
    }
    println!("  cd {}", infra_dir.display());
    println!("  ./clouduct-tf apply");
}

/// Run the staged provisioning wrapper from inside the infrastructure
/// directory. Its output streams through untouched.
fn provision(infra_dir: &Path, request: &GenerationRequest) -> Result<()> {
    // Spawning a relative program path combined with current_dir is
    // platform-dependent, so resolve everything to absolute paths first.
    let infra_dir = infra_dir.canonicalize().map_err(|e| {
        CloudError::ProvisionError(format!("failed to resolve '{}': {}", infra_dir.display(), e))
    })?;

    let mut command = Command::new(infra_dir.join("clouduct-tf"));
    command.arg("apply").current_dir(&infra_dir);
    if let Some(profile) = &request.profile {
        command.env("AWS_PROFILE", profile);
    }

    let status = command.status().map_err(|e| {
        CloudError::ProvisionError(format!(
            "failed to run clouduct-tf in '{}': {}",
            infra_dir.display(),
            e
        ))
    })?;

    if !status.success() {
        return Err(CloudError::ProvisionError(format!(
            "clouduct-tf apply failed (exit code {})",
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}
