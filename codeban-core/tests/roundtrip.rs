//! Roundtrip serialisation tests for `codeban-core` types.
//!
//! Each `#[case]` is isolated — no shared state.

use chrono::Utc;
use codeban_core::types::{
    Collaborator, Owner, Project, ProjectId, TodoId, TodoItem, TodoType, TypeName, UserId,
};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minimal_project() -> Project {
    let now = Utc::now();
    Project {
        id: ProjectId::from("abcd1234abcd1234"),
        name: "demo".to_string(),
        url: "https://github.com/alice/demo".to_string(),
        owner: Owner {
            id: UserId::from("u-alice"),
            login: "alice".to_string(),
            installation_id: 42,
        },
        ignored_paths: vec![],
        collaborators: vec![],
        todo_types: vec![],
        todos: vec![],
        created_at: now,
        updated_at: now,
    }
}

fn full_project() -> Project {
    let mut project = minimal_project();
    project.ignored_paths = vec!["vendor".to_string(), "node_modules".to_string()];
    project.collaborators = vec![Collaborator {
        id: UserId::from("u-bob"),
        login: "bob".to_string(),
        color: "210 100 50".to_string(),
    }];
    project.todo_types = vec![
        TodoType {
            name: TypeName::from("bug"),
            color: "15 100 50".to_string(),
        },
        TodoType {
            name: TypeName::from("known issue"),
            color: "90 100 50".to_string(),
        },
    ];
    project.todos = vec![
        TodoItem {
            id: TodoId::from("ab12cd34"),
            message: "fix the parser".to_string(),
            type_name: TypeName::from("bug"),
            completed: false,
            assignees: vec![UserId::from("u-bob")],
        },
        TodoItem {
            id: TodoId::from("zz99yy88"),
            message: "was broken".to_string(),
            type_name: TypeName::from("known issue"),
            completed: true,
            assignees: vec![],
        },
    ];
    project
}

fn unicode_project() -> Project {
    let mut project = minimal_project();
    project.name = "アプリ-проект-项目".to_string();
    project.todo_types = vec![TodoType {
        name: TypeName::from("バグ"),
        color: "120 100 50".to_string(),
    }];
    project.todos = vec![TodoItem {
        id: TodoId::from("ab12cd34"),
        message: "message with émojis & spéçïal chars: <>&\"'".to_string(),
        type_name: TypeName::from("バグ"),
        completed: false,
        assignees: vec![],
    }];
    project
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("minimal", minimal_project())]
#[case("all_fields", full_project())]
#[case("unicode_strings", unicode_project())]
fn project_roundtrip(#[case] label: &str, #[case] project: Project) {
    let yaml = serde_yaml::to_string(&project)
        .unwrap_or_else(|e| panic!("[{label}] serialize failed: {e}"));
    let back: Project = serde_yaml::from_str(&yaml)
        .unwrap_or_else(|e| panic!("[{label}] deserialize failed: {e}"));
    assert_eq!(project.id, back.id, "[{label}] project id");
    assert_eq!(project.name, back.name, "[{label}] project name");
    assert_eq!(project.url, back.url, "[{label}] project url");
    assert_eq!(project.owner, back.owner, "[{label}] owner");
    assert_eq!(
        project.ignored_paths, back.ignored_paths,
        "[{label}] ignored paths"
    );
    assert_eq!(
        project.collaborators, back.collaborators,
        "[{label}] collaborators"
    );
    assert_eq!(project.todo_types, back.todo_types, "[{label}] todo types");
    for (orig, got) in project.todos.iter().zip(back.todos.iter()) {
        assert_eq!(orig.id, got.id, "[{label}] todo id");
        assert_eq!(orig.message, got.message, "[{label}] todo message");
        assert_eq!(orig.completed, got.completed, "[{label}] todo completed");
        assert_eq!(orig.assignees, got.assignees, "[{label}] todo assignees");
    }
}

// ---------------------------------------------------------------------------
// Documents written by older versions omit the optional vectors entirely
// ---------------------------------------------------------------------------

#[rstest]
#[case("ignored_paths")]
#[case("collaborators")]
#[case("todo_types")]
#[case("todos")]
fn missing_optional_vectors_default_to_empty(#[case] field: &str) {
    let yaml = serde_yaml::to_string(&minimal_project()).expect("serialize");
    let stripped: String = yaml
        .lines()
        .filter(|line| !line.starts_with(&format!("{field}:")))
        .collect::<Vec<_>>()
        .join("\n");
    let back: Project = serde_yaml::from_str(&stripped).expect("deserialize without field");
    assert!(back.todos.is_empty());
    assert!(back.collaborators.is_empty());
}
