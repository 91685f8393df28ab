//! Reconciliation scan — the single source-of-truth sync between the
//! tracked tree and the project's structured records.
//!
//! ## Per-line classification
//!
//! - bare marker → mint an id, create the record, upsert the type, rewrite
//!   the line to carry `[<id>]` after the type separator
//! - id-tagged, unknown id → back-fill a record with the file's exact id
//!   (the text is the source of truth)
//! - id-tagged, known id → update the record if message, type or completed
//!   flag drifted; remember the id as found
//! - anything else → copied through unchanged
//!
//! ## Write ordering
//!
//! One remote write per changed file, never per line, files strictly
//! sequential. Remote first, checkout copy second, registry document last
//! (saved once, after the whole tree): a remote failure aborts the scan
//! before any structured state is persisted, so the store never claims
//! markers the tree doesn't carry.
//!
//! Running a scan twice with no intervening edits is a no-op: the second
//! pass sees only id-tagged lines that match their records.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;

use codeban_core::ids::IdSource;
use codeban_core::registry;
use codeban_core::types::{Project, ProjectId, TodoId, TodoItem, TypeName};
use codeban_core::{color, RegistryError};
use codeban_github::{RemoteHost, SCAN_COMMIT_MESSAGE};
use codeban_marker::{inject_id, Grammar, Marker};

use crate::error::EngineError;
use crate::walker::{exclusion_filter, Walk};
use crate::write::{atomic_write, read_utf8, repo_path};
use crate::gate;

/// Outcome of scanning one project.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Checkout-relative paths of files whose content changed (or would
    /// change, in dry-run mode).
    pub files_changed: Vec<String>,
    /// Records created (minted or back-filled from the text).
    pub created: usize,
    /// Records updated to follow message/type/completed drift in the text.
    pub updated: usize,
    /// Pre-existing active records resolved by absence.
    pub resolved: usize,
    pub dry_run: bool,
}

impl ScanReport {
    /// Whether the scan produced any store mutation.
    pub fn mutated(&self) -> bool {
        self.created + self.updated + self.resolved > 0
    }
}

/// Scan the project's checkout and reconcile its records with the text.
///
/// `dry_run` classifies and reports without touching the remote host, the
/// checkout, or the registry.
pub fn scan_project_at(
    home: &Path,
    project_id: &ProjectId,
    ids: &dyn IdSource,
    remote: &dyn RemoteHost,
    dry_run: bool,
) -> Result<ScanReport, EngineError> {
    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    let checkout = registry::checkout_dir_at(home, project_id);
    if !checkout.is_dir() {
        return Err(EngineError::CheckoutMissing { path: checkout });
    }

    let grammar = Grammar::new();
    let filter = exclusion_filter(&checkout, &project.ignored_paths, &[".git"]);

    let pre_existing: HashSet<TodoId> = project.todos.iter().map(|t| t.id.clone()).collect();
    let mut found: HashSet<TodoId> = HashSet::new();
    let mut report = ScanReport {
        dry_run,
        ..ScanReport::default()
    };

    for path in Walk::new(&checkout, filter) {
        let Some(contents) = read_utf8(&path)? else {
            continue;
        };

        let mut new_lines: Vec<String> = Vec::new();
        for line in contents.split('\n') {
            new_lines.push(reconcile_line(
                line,
                &grammar,
                &mut project,
                ids,
                &mut found,
                &mut report,
            ));
        }

        let new_contents = new_lines.join("\n");
        if new_contents != contents {
            let rel = repo_path(&checkout, &path);
            tracing::info!("scan rewrote {rel}");
            if !dry_run {
                remote.replace_file_contents(
                    &project.owner.login,
                    &project.url,
                    &rel,
                    &contents,
                    &new_contents,
                    SCAN_COMMIT_MESSAGE,
                )?;
                atomic_write(&path, &new_contents)?;
            }
            report.files_changed.push(rel);
        }
    }

    // Resolution by absence: every pre-existing active record whose marker
    // was not rediscovered is completed in one batch.
    for todo in &mut project.todos {
        if !todo.completed && pre_existing.contains(&todo.id) && !found.contains(&todo.id) {
            tracing::info!("resolving '{}' by absence", todo.id);
            todo.completed = true;
            report.resolved += 1;
        }
    }

    if !dry_run && report.mutated() {
        project.updated_at = Utc::now();
        registry::save_project_at(home, &project)?;
    }

    Ok(report)
}

/// `scan_project_at` convenience wrapper.
pub fn scan_project(
    project_id: &ProjectId,
    ids: &dyn IdSource,
    remote: &dyn RemoteHost,
    dry_run: bool,
) -> Result<ScanReport, EngineError> {
    let home = dirs::home_dir().ok_or(RegistryError::HomeNotFound)?;
    scan_project_at(&home, project_id, ids, remote, dry_run)
}

/// Classify one raw line, apply record mutations, and return the rewritten
/// line (identical to the input except for bare-marker id injection).
fn reconcile_line(
    line: &str,
    grammar: &Grammar,
    project: &mut Project,
    ids: &dyn IdSource,
    found: &mut HashSet<TodoId>,
    report: &mut ScanReport,
) -> String {
    let Some(marker) = grammar.parse(line) else {
        return line.to_owned();
    };

    match &marker.id {
        Some(id_str) => {
            let id = TodoId::from(id_str.as_str());
            let known = project
                .find_todo(&id)
                .map(|t| (t.message.clone(), t.type_name.clone(), t.completed));
            match known {
                Some((message, type_name, completed)) => {
                    if message != marker.message
                        || type_name.0 != marker.type_name
                        || completed != marker.completed
                    {
                        apply_drift(project, &id, &marker);
                        report.updated += 1;
                    }
                    found.insert(id);
                }
                None => {
                    // The file claims an id the store has never seen —
                    // trust the text and back-fill the record.
                    create_record(project, id, &marker, marker.completed);
                    report.created += 1;
                }
            }
            line.to_owned()
        }
        None => {
            let id = ids.todo_id();
            create_record(project, id.clone(), &marker, false);
            report.created += 1;
            inject_id(line, &marker, &id.0)
        }
    }
}

fn create_record(project: &mut Project, id: TodoId, marker: &Marker, completed: bool) {
    let type_name = TypeName::from(marker.type_name.as_str());
    project.type_or_insert(&type_name, color::type_color);
    project.todos.push(TodoItem {
        id,
        message: marker.message.clone(),
        type_name,
        completed,
        assignees: vec![],
    });
}

fn apply_drift(project: &mut Project, id: &TodoId, marker: &Marker) {
    let type_name = TypeName::from(marker.type_name.as_str());
    project.type_or_insert(&type_name, color::type_color);
    if let Some(todo) = project.find_todo_mut(id) {
        todo.message = marker.message.clone();
        todo.type_name = type_name;
        todo.completed = marker.completed;
    }
}
