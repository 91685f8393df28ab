//! `codeban scan` — run the reconciliation scan for one project.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use codeban_core::ids::RandomIds;
use codeban_core::types::ProjectId;
use codeban_engine::scan::scan_project_at;
use codeban_engine::ScanReport;
use codeban_github::{RemoteError, RemoteHost};

use super::context;

/// Arguments for `codeban scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Project to scan.
    pub project: String,

    /// Classify and report without touching the remote, the checkout,
    /// or the store.
    #[arg(long)]
    pub dry_run: bool,

    /// Remote host token (defaults to $CODEBAN_GITHUB_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
}

impl ScanArgs {
    pub fn run(self) -> Result<()> {
        let home = context::home()?;
        let project_id = ProjectId::from(self.project.as_str());
        let ids = RandomIds;

        // Dry-run mode never performs a remote write, so it needs no token.
        let report = if self.dry_run {
            scan_project_at(&home, &project_id, &ids, &Disconnected, true)
        } else {
            let remote = context::client(self.token)?;
            scan_project_at(&home, &project_id, &ids, &remote, false)
        }
        .with_context(|| format!("scan failed for '{}'", self.project))?;

        print_report(&self.project, &report);
        Ok(())
    }
}

/// Stand-in remote for dry-run mode; a dry-run that reaches it is a bug.
struct Disconnected;

impl RemoteHost for Disconnected {
    fn replace_file_contents(
        &self,
        _owner: &str,
        _repo_url: &str,
        _path: &str,
        _prior: &str,
        _new: &str,
        _message: &str,
    ) -> Result<(), RemoteError> {
        Err(RemoteError::Transport(
            "no remote host available in dry-run mode".to_owned(),
        ))
    }
}

fn print_report(project: &str, report: &ScanReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    if report.files_changed.is_empty() && !report.mutated() {
        println!("{prefix}✓ '{project}' — nothing to reconcile");
        return;
    }

    println!(
        "{prefix}✓ '{project}' reconciled ({} created, {} updated, {} resolved)",
        report.created.to_string().green(),
        report.updated.to_string().yellow(),
        report.resolved.to_string().bright_black(),
    );
    for path in &report.files_changed {
        println!("  ✎  {path}");
    }
}
