//! CLI argument parsing for clouduct.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};

/// Clouduct: bootstrap cloud projects from paired templates.
///
/// A template names two git repositories: an application skeleton and the
/// infrastructure that deploys it. `create` fetches both, seeds the
/// application with project-specific values, and prepares everything the
/// bundled `clouduct-tf` wrapper needs to provision the result.
#[derive(Parser, Debug)]
#[command(name = "clouduct")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for clouduct.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new project from a template.
    ///
    /// Fetches the application and infrastructure skeletons, replaces
    /// placeholders with project values, stages the deployment helpers,
    /// and writes the provisioning config. Runs `clouduct-tf apply`
    /// only with `--execute`.
    Create(CreateArgs),

    /// List available templates.
    ///
    /// Shows every template from the templates config with its source
    /// repositories.
    Templates(TemplatesArgs),
}

/// Arguments for the `create` command.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Name of the project to generate (lowercase letters, digits, dashes).
    pub project_name: String,

    /// Template to use. Required when the config lists more than one.
    #[arg(short, long)]
    pub template: Option<String>,

    /// Path or URL of the templates config.
    #[arg(long, default_value = "clouduct-templates.yaml")]
    pub templates_config: String,

    /// AWS profile handed to the provisioning tool.
    #[arg(short, long)]
    pub profile: Option<String>,

    /// AWS region the infrastructure is created in.
    #[arg(short, long, default_value = "eu-central-1")]
    pub region: String,

    /// Tag applied to provisioned resources, as key:value. Repeatable.
    #[arg(long = "tag", value_name = "KEY:VALUE")]
    pub tags: Vec<String>,

    /// Extra seed variable, as key=value. Repeatable.
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Run `clouduct-tf apply` after generation instead of only planning.
    #[arg(long)]
    pub execute: bool,
}

/// Arguments for the `templates` command.
#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    /// Path or URL of the templates config.
    #[arg(long, default_value = "clouduct-templates.yaml")]
    pub templates_config: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_create_minimal() {
        let cli = Cli::try_parse_from(["clouduct", "create", "acme"]).unwrap();
        if let Command::Create(args) = cli.command {
            assert_eq!(args.project_name, "acme");
            assert_eq!(args.template, None);
            assert_eq!(args.templates_config, "clouduct-templates.yaml");
            assert_eq!(args.profile, None);
            assert_eq!(args.region, "eu-central-1");
            assert!(args.tags.is_empty());
            assert!(args.vars.is_empty());
            assert!(!args.execute);
        } else {
            panic!("Expected Create command");
        }
    }

    #[test]
    fn parse_create_full() {
        let cli = Cli::try_parse_from([
            "clouduct",
            "create",
            "acme",
            "--template",
            "basic-java",
            "--templates-config",
            "templates.yaml",
            "--profile",
            "dev-account",
            "--region",
            "us-east-1",
            "--tag",
            "team:platform",
            "--tag",
            "env:dev",
            "--var",
            "stage=dev",
            "--execute",
        ])
        .unwrap();
        if let Command::Create(args) = cli.command {
            assert_eq!(args.project_name, "acme");
            assert_eq!(args.template, Some("basic-java".to_string()));
            assert_eq!(args.templates_config, "templates.yaml");
            assert_eq!(args.profile, Some("dev-account".to_string()));
            assert_eq!(args.region, "us-east-1");
            assert_eq!(args.tags, vec!["team:platform", "env:dev"]);
            assert_eq!(args.vars, vec!["stage=dev"]);
            assert!(args.execute);
        } else {
            panic!("Expected Create command");
        }
    }

    #[test]
    fn parse_create_short_flags() {
        let cli = Cli::try_parse_from([
            "clouduct", "create", "acme", "-t", "basic", "-p", "dev", "-r", "eu-west-1",
        ])
        .unwrap();
        if let Command::Create(args) = cli.command {
            assert_eq!(args.template, Some("basic".to_string()));
            assert_eq!(args.profile, Some("dev".to_string()));
            assert_eq!(args.region, "eu-west-1");
        } else {
            panic!("Expected Create command");
        }
    }

    #[test]
    fn parse_create_requires_project_name() {
        let result = Cli::try_parse_from(["clouduct", "create"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_templates() {
        let cli = Cli::try_parse_from(["clouduct", "templates"]).unwrap();
        if let Command::Templates(args) = cli.command {
            assert_eq!(args.templates_config, "clouduct-templates.yaml");
        } else {
            panic!("Expected Templates command");
        }
    }

    #[test]
    fn parse_templates_with_config() {
        let cli = Cli::try_parse_from([
            "clouduct",
            "templates",
            "--templates-config",
            "https://example.com/clouduct-templates.yaml",
        ])
        .unwrap();
        if let Command::Templates(args) = cli.command {
            assert_eq!(
                args.templates_config,
                "https://example.com/clouduct-templates.yaml"
            );
        } else {
            panic!("Expected Templates command");
        }
    }
}
