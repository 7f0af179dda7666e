//! Implementation of the `clouduct templates` command.

use crate::cli::TemplatesArgs;
use crate::error::Result;
use crate::registry::TemplateRegistry;

/// Execute the `clouduct templates` command.
pub fn cmd_templates(args: TemplatesArgs) -> Result<()> {
    let registry = TemplateRegistry::load(&args.templates_config)?;
    let names = registry.names();

    println!("Available templates ({}):", names.len());
    println!();
    for (name, template) in registry.iter() {
        println!("  {}", name);
        println!("    application:    {}", template.application);
        println!("    infrastructure: {}", template.infrastructure);
    }
    println!();
    println!("Generate a project with `clouduct create <name> --template <template>`.");

    Ok(())
}
