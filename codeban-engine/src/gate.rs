//! Per-project single-flight gate.
//!
//! Overlapping invocations for the same project (duplicate webhook
//! deliveries, a manual operation racing a scan) would otherwise race on the
//! checkout files and the registry document: each operation reads the
//! structured state once at the start and reconciles against that snapshot.
//! Every scan and mutation takes this gate first, so at most one proceeds at
//! a time per project; different projects never contend.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use codeban_core::types::ProjectId;

static GATES: OnceLock<Mutex<HashMap<String, Arc<Mutex<()>>>>> = OnceLock::new();

/// The serialization gate for a project. Callers hold the returned `Arc` and
/// lock it for the duration of the operation.
pub fn project_gate(id: &ProjectId) -> Arc<Mutex<()>> {
    let gates = GATES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = gates.lock();
    map.entry(id.0.clone())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_project_shares_one_gate() {
        let a = project_gate(&ProjectId::from("gate-test-a"));
        let b = project_gate(&ProjectId::from("gate-test-a"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_projects_do_not_contend() {
        let a = project_gate(&ProjectId::from("gate-test-b"));
        let b = project_gate(&ProjectId::from("gate-test-c"));
        assert!(!Arc::ptr_eq(&a, &b));
        let _ga = a.lock();
        // Must not deadlock: b is a different mutex.
        let _gb = b.lock();
    }
}
