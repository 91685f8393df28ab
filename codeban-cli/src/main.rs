//! Codeban — comment-embedded todo tracking CLI.
//!
//! # Usage
//!
//! ```text
//! codeban scan <project-id> [--dry-run] [--token <tok>]
//! codeban todo list <project-id> [--open|--done] [--json]
//! codeban todo add <project-id> --file <path> --line <n> --type <t> --message <m>
//! codeban todo done|reopen|rm <project-id> <todo-id>
//! codeban todo edit <project-id> <todo-id> [--message <m>] [--type <t>]
//! codeban todo assign <project-id> <todo-id> [<user-id>...]
//! codeban project list
//! codeban project tree <project-id>
//! codeban project cat <project-id> <path>
//! codeban project rm <project-id>
//! codeban type list|add|rm <project-id> [<name>]
//! ```
//!
//! Mutating commands authenticate against the remote host with
//! `$CODEBAN_GITHUB_TOKEN` (or `--token`) and act as `$CODEBAN_USER`
//! (or `--as`), defaulting to the project owner.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    project::ProjectCommand, scan::ScanArgs, todo::TodoCommand, types::TypeCommand,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "codeban",
    version,
    about = "Track todo markers embedded in source comments",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile a project's records with the markers in its checkout.
    Scan(ScanArgs),

    /// Inspect and mutate todo items.
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },

    /// Inspect registered projects and their checkouts.
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage a project's todo types.
    Type {
        #[command(subcommand)]
        command: TypeCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => args.run(),
        Commands::Todo { command } => commands::todo::run(command),
        Commands::Project { command } => commands::project::run(command),
        Commands::Type { command } => commands::types::run(command),
    }
}
