//! Domain types for the Codeban registry.
//!
//! Identifiers are newtype wrappers so a todo id can never be passed where a
//! project or user id belongs. All types are serializable/deserializable via
//! serde + serde_yaml; a [`Project`] document embeds everything one scan needs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project identifier (16 lowercase alphanumeric characters).
///
/// Doubles as the checkout directory name under `<home>/.codeban/repos/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed todo identifier (8 lowercase alphanumeric characters).
///
/// Minted once, immutable, and embedded verbatim in the source marker as the
/// correlation key between text and record. Unique within a project only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(pub String);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed todo type name, unique within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName(pub String);

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// The GitHub user owning a project's App installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: UserId,
    /// GitHub login of the account the installation token acts as.
    pub login: String,
    pub installation_id: u64,
}

/// A user granted access to a project's todos and assignable as an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: UserId,
    pub login: String,
    /// `"H S L"` display color from the warm spectrum.
    pub color: String,
}

/// A todo category declared for a project, with a generated display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoType {
    pub name: TypeName,
    /// `"H S L"` display color from the cool spectrum.
    pub color: String,
}

/// A tracked work item, mirrored by exactly one marker line in the checkout
/// while active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub message: String,
    pub type_name: TypeName,
    pub completed: bool,
    #[serde(default)]
    pub assignees: Vec<UserId>,
}

/// A tracked repository and everything scanning needs, embedded in a single
/// registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Remote repository URL; the repo name is the last path segment.
    pub url: String,
    pub owner: Owner,
    /// Checkout-relative paths excluded from scanning and tree presentation.
    #[serde(default)]
    pub ignored_paths: Vec<String>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(default)]
    pub todo_types: Vec<TodoType>,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Repository name — the last `/`-separated segment of the remote URL.
    pub fn repo_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }

    /// Whether `user` may act on this project (owner counts).
    pub fn is_collaborator(&self, user: &UserId) -> bool {
        self.owner.id == *user || self.collaborators.iter().any(|c| c.id == *user)
    }

    pub fn find_todo(&self, id: &TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == *id)
    }

    pub fn find_todo_mut(&mut self, id: &TodoId) -> Option<&mut TodoItem> {
        self.todos.iter_mut().find(|t| t.id == *id)
    }

    /// Fetch-or-create upsert for a todo type.
    ///
    /// `color` is only consulted on a miss; an existing type keeps its color.
    pub fn type_or_insert(&mut self, name: &TypeName, color: impl FnOnce() -> String) {
        if !self.todo_types.iter().any(|t| t.name == *name) {
            self.todo_types.push(TodoType {
                name: name.clone(),
                color: color(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::from("abcd1234abcd1234"),
            name: "demo".into(),
            url: "https://github.com/alice/demo".into(),
            owner: Owner {
                id: UserId::from("u-owner"),
                login: "alice".into(),
                installation_id: 42,
            },
            ignored_paths: vec!["vendor".into()],
            collaborators: vec![Collaborator {
                id: UserId::from("u-bob"),
                login: "bob".into(),
                color: "210 100 50".into(),
            }],
            todo_types: vec![],
            todos: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(ProjectId::from("p1").to_string(), "p1");
        assert_eq!(TodoId::from("ab12cd34").to_string(), "ab12cd34");
        assert_eq!(TypeName::from("bug").to_string(), "bug");
    }

    #[test]
    fn repo_name_is_last_url_segment() {
        assert_eq!(project().repo_name(), "demo");
    }

    #[test]
    fn owner_and_collaborators_can_act() {
        let p = project();
        assert!(p.is_collaborator(&UserId::from("u-owner")));
        assert!(p.is_collaborator(&UserId::from("u-bob")));
        assert!(!p.is_collaborator(&UserId::from("u-mallory")));
    }

    #[test]
    fn type_upsert_is_idempotent_and_keeps_color() {
        let mut p = project();
        p.type_or_insert(&TypeName::from("bug"), || "10 100 50".into());
        p.type_or_insert(&TypeName::from("bug"), || "99 100 50".into());
        assert_eq!(p.todo_types.len(), 1);
        assert_eq!(p.todo_types[0].color, "10 100 50");
    }

    #[test]
    fn project_serde_roundtrip() {
        let p = project();
        let yaml = serde_yaml::to_string(&p).expect("serialize");
        let back: Project = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(p, back);
    }
}
