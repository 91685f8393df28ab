//! Per-project YAML registry — the structured record store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.codeban/
//!   projects/
//!     <project_id>.yaml   (one document per project — mode 0600)
//!   repos/
//!     <project_id>/       (local checkout of the tracked tree)
//! ```
//!
//! The project document embeds owner, collaborators, ignored paths, todo
//! types and todo items, so a scan loads its whole structured state in one
//! read and persists it in one atomic save. Batch updates ("mark everything
//! not rediscovered as completed") are plain vector mutations followed by a
//! single `save_project_at`.
//!
//! # API pattern
//!
//! Every function touching the registry has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use crate::error::RegistryError;
use crate::types::{Project, ProjectId};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, RegistryError> {
    dirs::home_dir().ok_or(RegistryError::HomeNotFound)
}

/// `<home>/.codeban/projects/<id>.yaml` — pure, no I/O.
pub fn project_path_at(home: &Path, id: &ProjectId) -> PathBuf {
    home.join(".codeban")
        .join("projects")
        .join(format!("{}.yaml", id.0))
}

/// `<home>/.codeban/repos/<id>` — the project's local checkout root. Pure, no I/O.
pub fn checkout_dir_at(home: &Path, id: &ProjectId) -> PathBuf {
    home.join(".codeban").join("repos").join(&id.0)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a project document from `<home>/.codeban/projects/<id>.yaml`.
///
/// Returns `RegistryError::ProjectNotFound` if absent,
/// `RegistryError::Parse` (with path + line context) if malformed YAML.
pub fn load_project_at(home: &Path, id: &ProjectId) -> Result<Project, RegistryError> {
    let path = project_path_at(home, id);
    if !path.exists() {
        return Err(RegistryError::ProjectNotFound {
            id: id.clone(),
            path,
        });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| RegistryError::Parse { path, source: e })
}

/// `load_project_at` convenience wrapper.
pub fn load_project(id: &ProjectId) -> Result<Project, RegistryError> {
    load_project_at(&home()?, id)
}

/// List every registered project, sorted by id.
pub fn list_projects_at(home: &Path) -> Result<Vec<Project>, RegistryError> {
    let dir = home.join(".codeban").join("projects");
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut entries: Vec<_> = std::fs::read_dir(&dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    let mut result = Vec::new();
    for entry in entries {
        let fname = entry.file_name();
        let name = fname.to_string_lossy();
        if !name.ends_with(".yaml") {
            continue;
        }
        let contents = std::fs::read_to_string(entry.path())?;
        let project: Project = serde_yaml::from_str(&contents).map_err(|e| {
            RegistryError::Parse {
                path: entry.path(),
                source: e,
            }
        })?;
        result.push(project);
    }
    Ok(result)
}

/// `list_projects_at` convenience wrapper.
pub fn list_projects() -> Result<Vec<Project>, RegistryError> {
    list_projects_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a project to `<home>/.codeban/projects/<id>.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem — no EXDEV).
pub fn save_project_at(home: &Path, project: &Project) -> Result<(), RegistryError> {
    let path = project_path_at(home, &project.id);
    let Some(dir) = path.parent() else {
        return Err(RegistryError::Io(std::io::Error::other(
            "invalid project document path",
        )));
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        set_dir_permissions(dir)?;
    }

    let tmp_path = path.with_file_name(format!("{}.yaml.tmp", project.id.0));
    let yaml = serde_yaml::to_string(project)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_project_at` convenience wrapper.
pub fn save_project(project: &Project) -> Result<(), RegistryError> {
    save_project_at(&home()?, project)
}

// ---------------------------------------------------------------------------
// 4. Delete
// ---------------------------------------------------------------------------

/// Remove a project document and its checkout directory.
///
/// Missing pieces are ignored — deletion is idempotent.
pub fn delete_project_at(home: &Path, id: &ProjectId) -> Result<(), RegistryError> {
    let path = project_path_at(home, id);
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    let checkout = checkout_dir_at(home, id);
    if checkout.exists() {
        std::fs::remove_dir_all(&checkout)?;
    }
    Ok(())
}

/// `delete_project_at` convenience wrapper.
pub fn delete_project(id: &ProjectId) -> Result<(), RegistryError> {
    delete_project_at(&home()?, id)
}

// ---------------------------------------------------------------------------
// 5. Permissions (unix: registry documents hold installation ids)
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o700);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
