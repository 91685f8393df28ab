//! Codeban core library — domain types, project registry, identifiers, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`RegistryError`]
//! - [`registry`] — load / save / list / delete project documents
//! - [`ids`] — injected identifier generation ([`IdSource`])
//! - [`color`] — HSL display colors for types and users

pub mod color;
pub mod error;
pub mod ids;
pub mod registry;
pub mod types;

pub use error::RegistryError;
pub use ids::{IdSource, RandomIds, SequencedIds};
pub use types::{
    Collaborator, Owner, Project, ProjectId, TodoId, TodoItem, TodoType, TypeName, UserId,
};
