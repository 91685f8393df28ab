//! Targeted mutator — manual operations on a single todo.
//!
//! Every operation locates the one line carrying the target id (identifiers
//! are unique per project, so at most one file can contain it), rewrites
//! only that line, and stops after the first file whose content changes.
//! Write ordering matches the scan: remote first, checkout copy second,
//! registry document last.
//!
//! When no marker is found anywhere in the tree, operations that would
//! leave the store claiming a live marker (`edit`, `uncomplete`) fail with
//! [`EngineError::MarkerNotFound`]; operations that converge on "no active
//! marker" (`complete`, `delete`) apply the record change with a warning,
//! since the text already agrees.

use std::path::Path;

use chrono::Utc;

use codeban_core::ids::IdSource;
use codeban_core::registry;
use codeban_core::types::{Project, ProjectId, TodoId, TodoItem, TypeName, UserId};
use codeban_core::color;
use codeban_github::RemoteHost;
use codeban_marker::{
    comment_prefix_for, leading_whitespace, render_marker, Grammar, Marker, TYPE_NAME_MAX,
};

use crate::error::EngineError;
use crate::gate;
use crate::walker::{exclusion_filter, Walk};
use crate::write::{atomic_write, read_utf8, repo_path};

/// Commit message for manual marker insertion.
const CREATE_COMMIT_MESSAGE: &str = "Todo item manual creation";
/// Commit message for manual edits, toggles and deletions.
const UPDATE_COMMIT_MESSAGE: &str = "Todo item manual update";

/// Input for manual todo creation.
#[derive(Debug, Clone)]
pub struct NewTodo {
    /// Checkout-relative file path.
    pub file: String,
    /// 0-based insertion index; must be ≤ the file's line count.
    pub line: usize,
    pub message: String,
    pub type_name: String,
}

/// Input for a manual edit; at least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct EditTodo {
    pub message: Option<String>,
    pub type_name: Option<String>,
}

/// Outcome of a targeted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    /// Checkout-relative path of the rewritten file, when a line changed.
    pub file_changed: Option<String>,
}

// ---------------------------------------------------------------------------
// Manual creation
// ---------------------------------------------------------------------------

/// Insert a brand-new marker line and create its record.
///
/// Indentation is copied from the line at the insertion index (or the
/// previous line when appending); the comment prefix follows the file
/// extension. Returns the minted id.
pub fn create_todo_at(
    home: &Path,
    project_id: &ProjectId,
    actor: &UserId,
    data: &NewTodo,
    ids: &dyn IdSource,
    remote: &dyn RemoteHost,
) -> Result<TodoId, EngineError> {
    validate_type_name(&data.type_name)?;
    validate_message(&data.message)?;

    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    require_collaborator(&project, actor)?;

    let checkout = registry::checkout_dir_at(home, project_id);
    let path = checkout.join(&data.file);
    if !path.is_file() {
        return Err(EngineError::FileNotFound { path });
    }

    let contents = read_utf8(&path)?.ok_or_else(|| {
        EngineError::Validation(format!("file '{}' is not valid UTF-8", data.file))
    })?;
    let mut lines: Vec<String> = contents.split('\n').map(str::to_owned).collect();
    if data.line > lines.len() {
        return Err(EngineError::Validation(format!(
            "line {} is out of bounds for '{}' ({} lines)",
            data.line,
            data.file,
            lines.len()
        )));
    }

    let ws = if data.line == lines.len() {
        lines
            .last()
            .map(|l| leading_whitespace(l).to_owned())
            .unwrap_or_default()
    } else {
        leading_whitespace(&lines[data.line]).to_owned()
    };
    let extension = data.file.rsplit('.').next().unwrap_or_default();
    let prefix = comment_prefix_for(extension);

    let id = ids.todo_id();
    lines.insert(
        data.line,
        render_marker(&ws, prefix, &data.type_name, &id.0, &data.message),
    );
    let new_contents = lines.join("\n");

    remote.replace_file_contents(
        &project.owner.login,
        &project.url,
        &data.file,
        &contents,
        &new_contents,
        CREATE_COMMIT_MESSAGE,
    )?;
    atomic_write(&path, &new_contents)?;

    let type_name = TypeName::from(data.type_name.as_str());
    project.type_or_insert(&type_name, color::type_color);
    project.todos.push(TodoItem {
        id: id.clone(),
        message: data.message.clone(),
        type_name,
        completed: false,
        assignees: vec![],
    });
    save(home, &mut project)?;

    Ok(id)
}

// ---------------------------------------------------------------------------
// Delete / complete / uncomplete / edit
// ---------------------------------------------------------------------------

/// Strip the todo's marker line from the tree and delete its record.
pub fn delete_todo_at(
    home: &Path,
    project_id: &ProjectId,
    actor: &UserId,
    todo_id: &TodoId,
    remote: &dyn RemoteHost,
) -> Result<MutationReport, EngineError> {
    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    require_collaborator(&project, actor)?;
    require_todo(&project, todo_id)?;

    let outcome = rewrite_marker(home, &project, todo_id, remote, &|_, _| None)?;
    if matches!(outcome, Found::Missing) {
        tracing::warn!("no marker for '{todo_id}'; deleting record only");
    }

    project.todos.retain(|t| t.id != *todo_id);
    save(home, &mut project)?;
    Ok(report_for(outcome))
}

/// Toggle the marker sigil to `[^id]` and mark the record completed.
pub fn complete_todo_at(
    home: &Path,
    project_id: &ProjectId,
    actor: &UserId,
    todo_id: &TodoId,
    remote: &dyn RemoteHost,
) -> Result<MutationReport, EngineError> {
    toggle_todo_at(home, project_id, actor, todo_id, remote, true)
}

/// Toggle the marker sigil back to `[id]` and mark the record active.
pub fn uncomplete_todo_at(
    home: &Path,
    project_id: &ProjectId,
    actor: &UserId,
    todo_id: &TodoId,
    remote: &dyn RemoteHost,
) -> Result<MutationReport, EngineError> {
    toggle_todo_at(home, project_id, actor, todo_id, remote, false)
}

fn toggle_todo_at(
    home: &Path,
    project_id: &ProjectId,
    actor: &UserId,
    todo_id: &TodoId,
    remote: &dyn RemoteHost,
    completed: bool,
) -> Result<MutationReport, EngineError> {
    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    require_collaborator(&project, actor)?;
    require_todo(&project, todo_id)?;

    let outcome = rewrite_marker(home, &project, todo_id, remote, &|raw, marker| {
        Some(rebuild_line(
            raw,
            marker,
            completed,
            &marker.type_name,
            &marker.message,
        ))
    })?;
    match outcome {
        Found::Missing if !completed => {
            // Uncompleting with no marker would leave an active record with
            // no line backing it.
            return Err(EngineError::MarkerNotFound {
                id: todo_id.clone(),
            });
        }
        Found::Missing => {
            tracing::warn!("no marker for '{todo_id}'; completing record only");
        }
        _ => {}
    }

    if let Some(todo) = project.find_todo_mut(todo_id) {
        todo.completed = completed;
    }
    save(home, &mut project)?;
    Ok(report_for(outcome))
}

/// Replace the marker's message and/or type, then update the record —
/// but only if the rewrite actually changed the text.
pub fn edit_todo_at(
    home: &Path,
    project_id: &ProjectId,
    actor: &UserId,
    todo_id: &TodoId,
    data: &EditTodo,
    remote: &dyn RemoteHost,
) -> Result<MutationReport, EngineError> {
    if data.message.is_none() && data.type_name.is_none() {
        return Err(EngineError::Validation(
            "edit needs at least one of message or type".into(),
        ));
    }
    if let Some(message) = &data.message {
        validate_message(message)?;
    }
    if let Some(type_name) = &data.type_name {
        validate_type_name(type_name)?;
    }

    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    require_collaborator(&project, actor)?;
    require_todo(&project, todo_id)?;

    let outcome = rewrite_marker(home, &project, todo_id, remote, &|raw, marker| {
        let message = data.message.as_deref().unwrap_or(&marker.message);
        let type_name = data.type_name.as_deref().unwrap_or(&marker.type_name);
        Some(rebuild_line(raw, marker, marker.completed, type_name, message))
    })?;

    match &outcome {
        Found::Missing => Err(EngineError::MarkerNotFound {
            id: todo_id.clone(),
        }),
        Found::Unchanged => Ok(report_for(outcome)),
        Found::Changed { .. } => {
            if let Some(message) = &data.message {
                if let Some(todo) = project.find_todo_mut(todo_id) {
                    todo.message = message.clone();
                }
            }
            if let Some(type_name) = &data.type_name {
                let type_name = TypeName::from(type_name.as_str());
                project.type_or_insert(&type_name, color::type_color);
                if let Some(todo) = project.find_todo_mut(todo_id) {
                    todo.type_name = type_name;
                }
            }
            save(home, &mut project)?;
            Ok(report_for(outcome))
        }
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Replace the todo's assignee set wholesale. Every proposed assignee must
/// be a project collaborator; store-only, no file interaction.
pub fn set_assignees_at(
    home: &Path,
    project_id: &ProjectId,
    todo_id: &TodoId,
    assignees: &[UserId],
) -> Result<(), EngineError> {
    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    require_todo(&project, todo_id)?;
    for user in assignees {
        if !project.is_collaborator(user) {
            return Err(EngineError::NotACollaborator { user: user.clone() });
        }
    }

    if let Some(todo) = project.find_todo_mut(todo_id) {
        todo.assignees = assignees.to_vec();
    }
    save(home, &mut project)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Marker location and rewrite
// ---------------------------------------------------------------------------

enum Found {
    /// The marker's file changed and was pushed + written.
    Changed { rel: String },
    /// The marker was found but the transform produced identical text —
    /// no remote write, no checkout write.
    Unchanged,
    /// No marker carrying the target id anywhere in the tree.
    Missing,
}

fn report_for(outcome: Found) -> MutationReport {
    MutationReport {
        file_changed: match outcome {
            Found::Changed { rel } => Some(rel),
            _ => None,
        },
    }
}

/// Walk the checkout (scan's exclusion rules) until a file containing the
/// target marker is found, rewrite that line via `transform` (`None` drops
/// the line), push and write the file if it changed, and stop.
fn rewrite_marker(
    home: &Path,
    project: &Project,
    target: &TodoId,
    remote: &dyn RemoteHost,
    transform: &dyn Fn(&str, &Marker) -> Option<String>,
) -> Result<Found, EngineError> {
    let checkout = registry::checkout_dir_at(home, &project.id);
    if !checkout.is_dir() {
        return Err(EngineError::CheckoutMissing { path: checkout });
    }

    let grammar = Grammar::new();
    let filter = exclusion_filter(&checkout, &project.ignored_paths, &[".git"]);

    for path in Walk::new(&checkout, filter) {
        let Some(contents) = read_utf8(&path)? else {
            continue;
        };

        let mut matched = false;
        let mut new_lines: Vec<String> = Vec::new();
        for line in contents.split('\n') {
            match grammar.parse(line) {
                Some(marker) if marker.id.as_deref() == Some(target.0.as_str()) => {
                    matched = true;
                    if let Some(rewritten) = transform(line, &marker) {
                        new_lines.push(rewritten);
                    }
                }
                _ => new_lines.push(line.to_owned()),
            }
        }
        if !matched {
            continue;
        }

        let new_contents = new_lines.join("\n");
        if new_contents == contents {
            return Ok(Found::Unchanged);
        }

        let rel = repo_path(&checkout, &path);
        remote.replace_file_contents(
            &project.owner.login,
            &project.url,
            &rel,
            &contents,
            &new_contents,
            UPDATE_COMMIT_MESSAGE,
        )?;
        atomic_write(&path, &new_contents)?;
        return Ok(Found::Changed { rel });
    }

    Ok(Found::Missing)
}

/// Rebuild a parsed marker line from its parts, preserving the raw line's
/// leading and trailing whitespace byte-for-byte.
fn rebuild_line(
    raw: &str,
    marker: &Marker,
    completed: bool,
    type_name: &str,
    message: &str,
) -> String {
    let ws = leading_whitespace(raw);
    let trimmed = raw.trim();
    let trail = &raw[ws.len() + trimmed.len()..];
    let sigil = if completed { "^" } else { "" };
    let id = marker.id.as_deref().unwrap_or_default();
    format!(
        "{ws}{} {type_name}: [{sigil}{id}] {message}{trail}",
        marker.prefix
    )
}

// ---------------------------------------------------------------------------
// Shared guards
// ---------------------------------------------------------------------------

fn require_collaborator(project: &Project, actor: &UserId) -> Result<(), EngineError> {
    if project.is_collaborator(actor) {
        Ok(())
    } else {
        Err(EngineError::NotACollaborator {
            user: actor.clone(),
        })
    }
}

fn require_todo(project: &Project, id: &TodoId) -> Result<(), EngineError> {
    if project.find_todo(id).is_some() {
        Ok(())
    } else {
        Err(EngineError::TodoNotFound { id: id.clone() })
    }
}

fn save(home: &Path, project: &mut Project) -> Result<(), EngineError> {
    project.updated_at = Utc::now();
    registry::save_project_at(home, project)?;
    Ok(())
}

pub(crate) fn validate_type_name(name: &str) -> Result<(), EngineError> {
    if name.is_empty() || name != name.trim() {
        return Err(EngineError::Validation(
            "type name must be non-empty without surrounding whitespace".into(),
        ));
    }
    if name.contains(':') || name.contains('\n') {
        return Err(EngineError::Validation(
            "type name must not contain ':' or newlines".into(),
        ));
    }
    if name.len() > TYPE_NAME_MAX {
        return Err(EngineError::Validation(format!(
            "type name exceeds {TYPE_NAME_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), EngineError> {
    if message.trim().is_empty() {
        return Err(EngineError::Validation("message must be non-empty".into()));
    }
    if message.contains('\n') {
        return Err(EngineError::Validation(
            "message must be a single line".into(),
        ));
    }
    Ok(())
}
