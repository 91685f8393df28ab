//! `codeban project` — registry listings, checkout tree, file read-back,
//! and housekeeping.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use codeban_core::registry;
use codeban_core::types::ProjectId;
use codeban_engine::{admin, FsNode};

use super::context;

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List all registered projects.
    List,

    /// Print the project checkout as a tree.
    Tree(TreeArgs),

    /// Print one file from the project checkout.
    Cat(CatArgs),

    /// Remove a project's registry document and checkout.
    Rm(RmArgs),
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    pub project: String,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    pub project: String,
    /// Checkout-relative path.
    pub path: String,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    pub project: String,
}

pub fn run(cmd: ProjectCommand) -> Result<()> {
    match cmd {
        ProjectCommand::List => list(),
        ProjectCommand::Tree(args) => tree(args),
        ProjectCommand::Cat(args) => cat(args),
        ProjectCommand::Rm(args) => rm(args),
    }
}

#[derive(Tabled)]
struct ProjectTableRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "owner")]
    owner: String,
    #[tabled(rename = "open")]
    open: usize,
    #[tabled(rename = "done")]
    done: usize,
}

fn list() -> Result<()> {
    let home = context::home()?;
    let projects = registry::list_projects_at(&home).context("failed to load registry")?;

    if projects.is_empty() {
        println!("No projects registered.");
        return Ok(());
    }

    let rows: Vec<ProjectTableRow> = projects
        .iter()
        .map(|p| ProjectTableRow {
            id: p.id.0.clone(),
            name: p.name.clone(),
            owner: p.owner.login.clone(),
            open: p.todos.iter().filter(|t| !t.completed).count(),
            done: p.todos.iter().filter(|t| t.completed).count(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn tree(args: TreeArgs) -> Result<()> {
    let home = context::home()?;
    let root = admin::project_tree_at(&home, &ProjectId::from(args.project.as_str()))
        .with_context(|| format!("failed to build tree for '{}'", args.project))?;

    println!("{}", args.project.bold());
    print_node(&root, 0);
    Ok(())
}

fn print_node(node: &FsNode, depth: usize) {
    if depth > 0 {
        let indent = "  ".repeat(depth);
        match &node.children {
            Some(_) => println!("{indent}{}/", node.name.blue()),
            None => println!("{indent}{}", node.name),
        }
    }
    if let Some(children) = &node.children {
        for child in children {
            print_node(child, depth + 1);
        }
    }
}

fn cat(args: CatArgs) -> Result<()> {
    let home = context::home()?;
    let body = admin::read_project_file_at(
        &home,
        &ProjectId::from(args.project.as_str()),
        &args.path,
    )
    .with_context(|| format!("failed to read '{}'", args.path))?;
    print!("{body}");
    Ok(())
}

fn rm(args: RmArgs) -> Result<()> {
    let home = context::home()?;
    registry::delete_project_at(&home, &ProjectId::from(args.project.as_str()))
        .with_context(|| format!("failed to remove '{}'", args.project))?;
    println!("✓ Removed '{}'", args.project);
    Ok(())
}
