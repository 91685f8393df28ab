//! `codeban todo` — list and mutate todo items.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use codeban_core::ids::RandomIds;
use codeban_core::types::{ProjectId, TodoId, UserId};
use codeban_engine::{admin, mutate, EditTodo, NewTodo, TodoView};

use super::context;

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    /// List a project's todos.
    List(ListArgs),

    /// Insert a new marker line and create its record.
    Add(AddArgs),

    /// Mark a todo completed (flips the marker sigil to `[^id]`).
    Done(TargetArgs),

    /// Reactivate a completed todo (flips the sigil back to `[id]`).
    Reopen(TargetArgs),

    /// Remove a todo's marker line and its record.
    Rm(TargetArgs),

    /// Rewrite a todo's message and/or type in place.
    Edit(EditArgs),

    /// Replace a todo's assignees (omit users to clear).
    Assign(AssignArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub project: String,

    /// Only active todos.
    #[arg(long, conflicts_with = "done")]
    pub open: bool,

    /// Only completed todos.
    #[arg(long)]
    pub done: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub project: String,

    /// Checkout-relative file to insert into.
    #[arg(long)]
    pub file: String,

    /// 0-based line index to insert at.
    #[arg(long)]
    pub line: usize,

    /// Todo type (created on first use).
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: String,

    #[arg(long)]
    pub message: String,

    /// Act as this user id (defaults to $CODEBAN_USER, then the owner).
    #[arg(long = "as", value_name = "USER")]
    pub actor: Option<String>,

    /// Remote host token (defaults to $CODEBAN_GITHUB_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    pub project: String,
    pub todo: String,

    /// Act as this user id (defaults to $CODEBAN_USER, then the owner).
    #[arg(long = "as", value_name = "USER")]
    pub actor: Option<String>,

    /// Remote host token (defaults to $CODEBAN_GITHUB_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub project: String,
    pub todo: String,

    #[arg(long)]
    pub message: Option<String>,

    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: Option<String>,

    /// Act as this user id (defaults to $CODEBAN_USER, then the owner).
    #[arg(long = "as", value_name = "USER")]
    pub actor: Option<String>,

    /// Remote host token (defaults to $CODEBAN_GITHUB_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    pub project: String,
    pub todo: String,

    /// Collaborator ids; the full set replaces the previous one.
    pub users: Vec<String>,
}

pub fn run(cmd: TodoCommand) -> Result<()> {
    match cmd {
        TodoCommand::List(args) => list(args),
        TodoCommand::Add(args) => add(args),
        TodoCommand::Done(args) => done(args),
        TodoCommand::Reopen(args) => reopen(args),
        TodoCommand::Rm(args) => rm(args),
        TodoCommand::Edit(args) => edit(args),
        TodoCommand::Assign(args) => assign(args),
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct TodoTableRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "type")]
    type_name: String,
    #[tabled(rename = "message")]
    message: String,
    #[tabled(rename = "assignees")]
    assignees: String,
}

#[derive(Serialize)]
struct TodoJson {
    id: String,
    message: String,
    r#type: String,
    color: String,
    completed: bool,
    assignees: Vec<String>,
}

fn list(args: ListArgs) -> Result<()> {
    let home = context::home()?;
    let completed = match (args.open, args.done) {
        (true, _) => Some(false),
        (_, true) => Some(true),
        _ => None,
    };
    let views = admin::list_todos_with_color_at(
        &home,
        &ProjectId::from(args.project.as_str()),
        completed,
    )
    .with_context(|| format!("failed to list todos for '{}'", args.project))?;

    if args.json {
        print_json(views)?;
        return Ok(());
    }
    print_table(&args.project, views);
    Ok(())
}

fn print_json(views: Vec<TodoView>) -> Result<()> {
    let payload: Vec<TodoJson> = views
        .into_iter()
        .map(|v| TodoJson {
            id: v.id.0,
            message: v.message,
            r#type: v.type_name.0,
            color: v.color,
            completed: v.completed,
            assignees: v.assignees.into_iter().map(|a| a.login).collect(),
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize todo JSON")?
    );
    Ok(())
}

fn print_table(project: &str, views: Vec<TodoView>) {
    if views.is_empty() {
        println!("No todos in '{project}'.");
        return;
    }

    let rows: Vec<TodoTableRow> = views
        .into_iter()
        .map(|v| TodoTableRow {
            id: v.id.0,
            status: if v.completed {
                "DONE".green().to_string()
            } else {
                "OPEN".yellow().to_string()
            },
            type_name: v.type_name.0,
            message: v.message,
            assignees: v
                .assignees
                .iter()
                .map(|a| a.login.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

fn add(args: AddArgs) -> Result<()> {
    let home = context::home()?;
    let project_id = ProjectId::from(args.project.as_str());
    let project = context::load_project(&home, &args.project)?;
    let actor = context::actor(args.actor, &project);
    let remote = context::client(args.token)?;

    let id = mutate::create_todo_at(
        &home,
        &project_id,
        &actor,
        &NewTodo {
            file: args.file.clone(),
            line: args.line,
            message: args.message,
            type_name: args.type_name,
        },
        &RandomIds,
        &remote,
    )
    .with_context(|| format!("failed to add todo in '{}'", args.file))?;

    println!("✓ Added todo '{id}' at {}:{}", args.file, args.line);
    Ok(())
}

fn done(args: TargetArgs) -> Result<()> {
    let home = context::home()?;
    let project_id = ProjectId::from(args.project.as_str());
    let project = context::load_project(&home, &args.project)?;
    let actor = context::actor(args.actor, &project);
    let remote = context::client(args.token)?;

    mutate::complete_todo_at(
        &home,
        &project_id,
        &actor,
        &TodoId::from(args.todo.as_str()),
        &remote,
    )
    .with_context(|| format!("failed to complete '{}'", args.todo))?;
    println!("✓ Completed '{}'", args.todo);
    Ok(())
}

fn reopen(args: TargetArgs) -> Result<()> {
    let home = context::home()?;
    let project_id = ProjectId::from(args.project.as_str());
    let project = context::load_project(&home, &args.project)?;
    let actor = context::actor(args.actor, &project);
    let remote = context::client(args.token)?;

    mutate::uncomplete_todo_at(
        &home,
        &project_id,
        &actor,
        &TodoId::from(args.todo.as_str()),
        &remote,
    )
    .with_context(|| format!("failed to reopen '{}'", args.todo))?;
    println!("✓ Reopened '{}'", args.todo);
    Ok(())
}

fn rm(args: TargetArgs) -> Result<()> {
    let home = context::home()?;
    let project_id = ProjectId::from(args.project.as_str());
    let project = context::load_project(&home, &args.project)?;
    let actor = context::actor(args.actor, &project);
    let remote = context::client(args.token)?;

    mutate::delete_todo_at(
        &home,
        &project_id,
        &actor,
        &TodoId::from(args.todo.as_str()),
        &remote,
    )
    .with_context(|| format!("failed to delete '{}'", args.todo))?;
    println!("✓ Deleted '{}'", args.todo);
    Ok(())
}

fn edit(args: EditArgs) -> Result<()> {
    let home = context::home()?;
    let project_id = ProjectId::from(args.project.as_str());
    let project = context::load_project(&home, &args.project)?;
    let actor = context::actor(args.actor, &project);
    let remote = context::client(args.token)?;

    let report = mutate::edit_todo_at(
        &home,
        &project_id,
        &actor,
        &TodoId::from(args.todo.as_str()),
        &EditTodo {
            message: args.message,
            type_name: args.type_name,
        },
        &remote,
    )
    .with_context(|| format!("failed to edit '{}'", args.todo))?;

    match report.file_changed {
        Some(path) => println!("✓ Edited '{}' ({path})", args.todo),
        None => println!("✓ '{}' already up to date", args.todo),
    }
    Ok(())
}

fn assign(args: AssignArgs) -> Result<()> {
    let home = context::home()?;
    let users: Vec<UserId> = args
        .users
        .iter()
        .map(|u| UserId::from(u.as_str()))
        .collect();

    mutate::set_assignees_at(
        &home,
        &ProjectId::from(args.project.as_str()),
        &TodoId::from(args.todo.as_str()),
        &users,
    )
    .with_context(|| format!("failed to assign '{}'", args.todo))?;

    if users.is_empty() {
        println!("✓ Cleared assignees on '{}'", args.todo);
    } else {
        println!("✓ Assigned '{}' to {} user(s)", args.todo, users.len());
    }
    Ok(())
}
