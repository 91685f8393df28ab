//! `codeban type` — declare and remove todo types.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use codeban_core::types::ProjectId;
use codeban_engine::admin;

use super::context;

#[derive(Subcommand, Debug)]
pub enum TypeCommand {
    /// List a project's todo types.
    List(ProjectArg),

    /// Declare a new todo type.
    Add(NameArgs),

    /// Remove an unused todo type.
    Rm(NameArgs),
}

#[derive(Args, Debug)]
pub struct ProjectArg {
    pub project: String,
}

#[derive(Args, Debug)]
pub struct NameArgs {
    pub project: String,
    pub name: String,
}

pub fn run(cmd: TypeCommand) -> Result<()> {
    match cmd {
        TypeCommand::List(args) => list(args),
        TypeCommand::Add(args) => add(args),
        TypeCommand::Rm(args) => rm(args),
    }
}

fn list(args: ProjectArg) -> Result<()> {
    let home = context::home()?;
    let types = admin::list_types_at(&home, &ProjectId::from(args.project.as_str()))
        .with_context(|| format!("failed to list types for '{}'", args.project))?;

    if types.is_empty() {
        println!("No types declared in '{}'.", args.project);
        return Ok(());
    }
    for t in types {
        println!("{}  {}", t.name.0.bold(), format!("hsl({})", t.color).bright_black());
    }
    Ok(())
}

fn add(args: NameArgs) -> Result<()> {
    let home = context::home()?;
    let created = admin::add_type_at(&home, &ProjectId::from(args.project.as_str()), &args.name)
        .with_context(|| format!("failed to add type '{}'", args.name))?;
    println!("✓ Added type '{}' ({})", created.name, created.color);
    Ok(())
}

fn rm(args: NameArgs) -> Result<()> {
    let home = context::home()?;
    admin::delete_type_at(&home, &ProjectId::from(args.project.as_str()), &args.name)
        .with_context(|| format!("failed to remove type '{}'", args.name))?;
    println!("✓ Removed type '{}'", args.name);
    Ok(())
}
