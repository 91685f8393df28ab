//! Shared fixtures for engine integration tests.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;

use codeban_core::registry;
use codeban_core::types::{
    Collaborator, Owner, Project, ProjectId, TodoId, TodoItem, TypeName, UserId,
};
use codeban_github::{RemoteError, RemoteHost};

/// One recorded remote write.
#[derive(Debug, Clone)]
pub struct Push {
    pub path: String,
    pub prior: String,
    pub new: String,
    pub message: String,
}

/// Recording [`RemoteHost`] double; optionally rejects every write with a
/// precondition failure.
#[derive(Default)]
pub struct RecordingRemote {
    pushes: Mutex<Vec<Push>>,
    pub reject_with_precondition: bool,
}

impl RecordingRemote {
    pub fn rejecting() -> Self {
        Self {
            pushes: Mutex::new(Vec::new()),
            reject_with_precondition: true,
        }
    }

    pub fn pushes(&self) -> Vec<Push> {
        self.pushes.lock().expect("pushes lock").clone()
    }
}

impl RemoteHost for RecordingRemote {
    fn replace_file_contents(
        &self,
        _owner: &str,
        _repo_url: &str,
        path: &str,
        prior: &str,
        new: &str,
        message: &str,
    ) -> Result<(), RemoteError> {
        if self.reject_with_precondition {
            return Err(RemoteError::PreconditionFailed {
                path: path.to_owned(),
            });
        }
        self.pushes.lock().expect("pushes lock").push(Push {
            path: path.to_owned(),
            prior: prior.to_owned(),
            new: new.to_owned(),
            message: message.to_owned(),
        });
        Ok(())
    }
}

/// Owner of every fixture project.
pub fn alice() -> UserId {
    UserId::from("u-alice")
}

/// Collaborator on every fixture project.
pub fn bob() -> UserId {
    UserId::from("u-bob")
}

/// Register a project with an empty checkout directory.
pub fn project_fixture(home: &Path, id: &str) -> Project {
    let _ = env_logger::builder().is_test(true).try_init();
    let now = Utc::now();
    let project = Project {
        id: ProjectId::from(id),
        name: id.to_owned(),
        url: format!("https://github.com/alice/{id}"),
        owner: Owner {
            id: alice(),
            login: "alice".into(),
            installation_id: 42,
        },
        ignored_paths: vec![],
        collaborators: vec![Collaborator {
            id: bob(),
            login: "bob".into(),
            color: "210 100 50".into(),
        }],
        todo_types: vec![],
        todos: vec![],
        created_at: now,
        updated_at: now,
    };
    registry::save_project_at(home, &project).expect("save fixture project");
    std::fs::create_dir_all(registry::checkout_dir_at(home, &project.id))
        .expect("create checkout");
    project
}

/// Seed a todo record directly in the registry document.
pub fn seed_todo(home: &Path, project_id: &ProjectId, id: &str, type_name: &str, message: &str) {
    let mut project = registry::load_project_at(home, project_id).expect("load");
    let type_name = TypeName::from(type_name);
    project.type_or_insert(&type_name, || "90 100 50".into());
    project.todos.push(TodoItem {
        id: TodoId::from(id),
        message: message.to_owned(),
        type_name,
        completed: false,
        assignees: vec![],
    });
    registry::save_project_at(home, &project).expect("save");
}

pub fn write_file(home: &Path, project_id: &ProjectId, rel: &str, content: &str) {
    let path = registry::checkout_dir_at(home, project_id).join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, content).expect("write fixture file");
}

pub fn read_file(home: &Path, project_id: &ProjectId, rel: &str) -> String {
    let path = registry::checkout_dir_at(home, project_id).join(rel);
    std::fs::read_to_string(path).expect("read fixture file")
}
