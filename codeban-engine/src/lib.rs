//! # codeban-engine
//!
//! Reconciliation engine and targeted mutator for Codeban.
//!
//! [`scan::scan_project_at`] reconciles a project's structured records with
//! the markers discovered in its checkout; the [`mutate`] operations locate
//! and rewrite a single marker line; [`admin`] covers type management,
//! listings and the presentation tree. Both scan and mutations serialize
//! per project through [`gate::project_gate`] and finish each changed file
//! with exactly one remote write.

pub mod admin;
pub mod error;
pub mod gate;
pub mod mutate;
pub mod scan;
pub mod walker;

mod write;

pub use admin::TodoView;
pub use error::EngineError;
pub use mutate::{EditTodo, MutationReport, NewTodo};
pub use scan::ScanReport;
pub use walker::{FsNode, Walk};
