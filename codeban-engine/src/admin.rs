//! Project-level operations: type management, read-only listings, and the
//! presentation tree.

use std::path::Path;

use chrono::Utc;

use codeban_core::registry;
use codeban_core::types::{Collaborator, ProjectId, TodoId, TodoItem, TodoType, TypeName};
use codeban_core::color;

use crate::error::{io_err, EngineError};
use crate::gate;
use crate::mutate::validate_type_name;
use crate::walker::{exclusion_filter, tree_view, FsNode};

// ---------------------------------------------------------------------------
// Type management
// ---------------------------------------------------------------------------

/// Declare a todo type explicitly. Conflicts if the name already exists.
pub fn add_type_at(home: &Path, project_id: &ProjectId, name: &str) -> Result<TodoType, EngineError> {
    validate_type_name(name)?;

    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    let type_name = TypeName::from(name);
    if project.todo_types.iter().any(|t| t.name == type_name) {
        return Err(EngineError::TypeExists { name: type_name });
    }

    let created = TodoType {
        name: type_name,
        color: color::type_color(),
    };
    project.todo_types.push(created.clone());
    project.updated_at = Utc::now();
    registry::save_project_at(home, &project)?;
    Ok(created)
}

/// Delete a todo type. Conflicts while any item of that type exists,
/// leaving both the type and the items untouched.
pub fn delete_type_at(home: &Path, project_id: &ProjectId, name: &str) -> Result<(), EngineError> {
    let gate = gate::project_gate(project_id);
    let _guard = gate.lock();

    let mut project = registry::load_project_at(home, project_id)?;
    let type_name = TypeName::from(name);
    if !project.todo_types.iter().any(|t| t.name == type_name) {
        return Err(EngineError::TypeNotFound { name: type_name });
    }
    if project.todos.iter().any(|t| t.type_name == type_name) {
        return Err(EngineError::TypeInUse { name: type_name });
    }

    project.todo_types.retain(|t| t.name != type_name);
    project.updated_at = Utc::now();
    registry::save_project_at(home, &project)?;
    Ok(())
}

/// All declared types for a project.
pub fn list_types_at(home: &Path, project_id: &ProjectId) -> Result<Vec<TodoType>, EngineError> {
    Ok(registry::load_project_at(home, project_id)?.todo_types)
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Todos for a project, optionally filtered by completion state.
pub fn list_todos_at(
    home: &Path,
    project_id: &ProjectId,
    completed: Option<bool>,
) -> Result<Vec<TodoItem>, EngineError> {
    let project = registry::load_project_at(home, project_id)?;
    Ok(project
        .todos
        .into_iter()
        .filter(|t| completed.is_none_or(|c| t.completed == c))
        .collect())
}

/// A todo enriched with its type color and resolved assignees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub id: TodoId,
    pub message: String,
    pub type_name: TypeName,
    pub completed: bool,
    /// The type's `"H S L"` color.
    pub color: String,
    pub assignees: Vec<Collaborator>,
}

/// Todos enriched with type color and assignee display data.
pub fn list_todos_with_color_at(
    home: &Path,
    project_id: &ProjectId,
    completed: Option<bool>,
) -> Result<Vec<TodoView>, EngineError> {
    let project = registry::load_project_at(home, project_id)?;
    Ok(project
        .todos
        .iter()
        .filter(|t| completed.is_none_or(|c| t.completed == c))
        .map(|t| TodoView {
            id: t.id.clone(),
            message: t.message.clone(),
            type_name: t.type_name.clone(),
            completed: t.completed,
            color: project
                .todo_types
                .iter()
                .find(|ty| ty.name == t.type_name)
                .map(|ty| ty.color.clone())
                .unwrap_or_default(),
            assignees: t
                .assignees
                .iter()
                .filter_map(|id| project.collaborators.iter().find(|c| c.id == *id))
                .cloned()
                .collect(),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Presentation tree and file read-back
// ---------------------------------------------------------------------------

/// Presentation tree of the project's checkout; excludes version-control
/// metadata and every declared ignored path.
pub fn project_tree_at(home: &Path, project_id: &ProjectId) -> Result<FsNode, EngineError> {
    let project = registry::load_project_at(home, project_id)?;
    let checkout = registry::checkout_dir_at(home, project_id);
    if !checkout.is_dir() {
        return Err(EngineError::CheckoutMissing { path: checkout });
    }
    let filter = exclusion_filter(&checkout, &project.ignored_paths, &[".git", ".github"]);
    tree_view(&checkout, &filter).map_err(|e| io_err(&checkout, e))
}

/// Raw contents of one file in the project's checkout.
pub fn read_project_file_at(
    home: &Path,
    project_id: &ProjectId,
    rel_path: &str,
) -> Result<String, EngineError> {
    // Validate the project exists before touching the checkout.
    registry::load_project_at(home, project_id)?;
    let path = registry::checkout_dir_at(home, project_id).join(rel_path);
    if !path.is_file() {
        return Err(EngineError::FileNotFound { path });
    }
    std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))
}
