//! Identifier generation capability.
//!
//! Identifiers are lowercase alphanumeric: 8 characters for todos, 16 for
//! projects. Collision avoidance is probabilistic — the registry is scoped
//! per project, so the 8-char space is ample. The generator is injected
//! (`&dyn IdSource`) so engine tests can run with a deterministic source.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::types::{ProjectId, TodoId};

/// Alphabet for generated identifiers.
pub const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a todo identifier.
pub const TODO_ID_LEN: usize = 8;

/// Length of a project identifier.
pub const PROJECT_ID_LEN: usize = 16;

/// Source of fresh identifiers.
pub trait IdSource {
    fn todo_id(&self) -> TodoId;
    fn project_id(&self) -> ProjectId;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomIds;

fn random_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

impl IdSource for RandomIds {
    fn todo_id(&self) -> TodoId {
        TodoId(random_id(TODO_ID_LEN))
    }

    fn project_id(&self) -> ProjectId {
        ProjectId(random_id(PROJECT_ID_LEN))
    }
}

/// Deterministic source for tests: ids are zero-padded lowercase hex counters
/// (`00000001`, `00000002`, …), which stay inside [`ID_ALPHABET`].
#[derive(Debug, Default)]
pub struct SequencedIds {
    next: AtomicU64,
}

impl IdSource for SequencedIds {
    fn todo_id(&self) -> TodoId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        TodoId(format!("{n:08x}"))
    }

    fn project_id(&self) -> ProjectId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        ProjectId(format!("{n:016x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_alphabet(s: &str) -> bool {
        s.bytes().all(|b| ID_ALPHABET.contains(&b))
    }

    #[test]
    fn random_todo_id_shape() {
        let id = RandomIds.todo_id();
        assert_eq!(id.0.len(), TODO_ID_LEN);
        assert!(in_alphabet(&id.0));
    }

    #[test]
    fn random_project_id_shape() {
        let id = RandomIds.project_id();
        assert_eq!(id.0.len(), PROJECT_ID_LEN);
        assert!(in_alphabet(&id.0));
    }

    #[test]
    fn sequenced_ids_are_deterministic() {
        let ids = SequencedIds::default();
        assert_eq!(ids.todo_id().0, "00000001");
        assert_eq!(ids.todo_id().0, "00000002");
        assert!(in_alphabet(&ids.todo_id().0));
    }
}
