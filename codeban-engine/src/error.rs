//! Error types for codeban-engine.

use std::path::PathBuf;

use thiserror::Error;

use codeban_core::error::RegistryError;
use codeban_core::types::{TodoId, TypeName, UserId};
use codeban_github::RemoteError;

/// All errors that can arise from scan and mutation operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An error from the project registry (including project-not-found).
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A remote host failure. Precondition mismatches propagate here and are
    /// never retried silently — a retry could overwrite a human edit.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project's local checkout does not exist — infrastructure failure,
    /// fatal for the requested operation.
    #[error("missing local checkout at {path}")]
    CheckoutMissing { path: PathBuf },

    /// A file named by a manual operation is absent from the checkout.
    #[error("file does not exist: {path}")]
    FileNotFound { path: PathBuf },

    /// No record with the given id exists in the project.
    #[error("todo '{id}' does not exist")]
    TodoNotFound { id: TodoId },

    /// The record exists but no marker carrying its id was found anywhere in
    /// the tracked tree, and the operation needs the marker to proceed.
    #[error("no marker for todo '{id}' found in the tracked tree")]
    MarkerNotFound { id: TodoId },

    /// Explicit type creation collided with an existing name.
    #[error("todo type '{name}' already exists")]
    TypeExists { name: TypeName },

    /// A type cannot be deleted while items of that type exist.
    #[error("there are items of type '{name}'; resolve them before deleting the type")]
    TypeInUse { name: TypeName },

    /// No type with the given name exists in the project.
    #[error("todo type '{name}' does not exist")]
    TypeNotFound { name: TypeName },

    /// The acting user is not a collaborator on the project.
    #[error("user '{user}' is not a collaborator on this project")]
    NotACollaborator { user: UserId },

    /// Input rejected before any store or remote mutation.
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}
