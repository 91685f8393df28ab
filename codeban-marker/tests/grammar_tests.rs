//! Parameterised grammar tests for `codeban-marker`.
//!
//! Each `#[case]` is one source line; no shared state between cases.

use codeban_marker::{Grammar, Marker, COMMENT_PREFIXES};
use rstest::rstest;

fn grammar() -> Grammar {
    Grammar::new()
}

// ---------------------------------------------------------------------------
// Bare markers
// ---------------------------------------------------------------------------

#[rstest]
#[case("# bug: fix the parser", "#", "bug", "fix the parser")]
#[case("// todo: refactor this", "//", "todo", "refactor this")]
#[case("% note: check citation", "%", "note", "check citation")]
#[case("-- perf: slow query", "--", "perf", "slow query")]
#[case("' cleanup: remove dead sub", "'", "cleanup", "remove dead sub")]
#[case("; fixme: handle carry flag", ";", "fixme", "handle carry flag")]
fn bare_marker_per_prefix(
    #[case] line: &str,
    #[case] prefix: &str,
    #[case] type_name: &str,
    #[case] message: &str,
) {
    let m = grammar().parse(line).expect("marker");
    assert_eq!(m.prefix, prefix);
    assert_eq!(m.type_name, type_name);
    assert_eq!(m.id, None);
    assert!(!m.completed);
    assert_eq!(m.message, message);
}

#[test]
fn indentation_is_ignored_for_matching() {
    let m = grammar().parse("        # bug: indented").expect("marker");
    assert_eq!(m.type_name, "bug");
    assert_eq!(m.message, "indented");
}

#[test]
fn multi_word_type_names_are_allowed() {
    let m = grammar().parse("# known issue: flaky test").expect("marker");
    assert_eq!(m.type_name, "known issue");
}

// ---------------------------------------------------------------------------
// ID-tagged markers
// ---------------------------------------------------------------------------

#[test]
fn active_tagged_marker() {
    let m = grammar()
        .parse("// bug: [ab12cd34] still broken")
        .expect("marker");
    assert_eq!(
        m,
        Marker {
            prefix: "//",
            type_name: "bug".into(),
            id: Some("ab12cd34".into()),
            completed: false,
            message: "still broken".into(),
        }
    );
}

#[test]
fn completed_tagged_marker() {
    let m = grammar()
        .parse("# bug: [^ab12cd34] was broken")
        .expect("marker");
    assert_eq!(m.id.as_deref(), Some("ab12cd34"));
    assert!(m.completed);
    assert_eq!(m.message, "was broken");
}

#[rstest]
#[case("# bug: [AB12CD34] uppercase id")]
#[case("# bug: [ab12cd3] short id")]
#[case("# bug: [ab12cd345] long id")]
fn malformed_ids_fall_back_to_bare(#[case] line: &str) {
    // The bracketed text fails the id shape, so it is part of the message.
    let m = grammar().parse(line).expect("marker");
    assert_eq!(m.id, None);
    assert!(m.message.starts_with('['));
}

// ---------------------------------------------------------------------------
// Inert lines
// ---------------------------------------------------------------------------

#[rstest]
#[case("plain code line")]
#[case("#no space after prefix")]
#[case("# missing colon message")]
#[case("# : empty type")]
#[case("# bug:")]
#[case("")]
fn inert_lines_do_not_parse(#[case] line: &str) {
    assert_eq!(grammar().parse(line), None);
}

#[test]
fn whitespace_padded_type_is_inert() {
    // "bug " before the colon would otherwise drift from the stored "bug".
    assert_eq!(grammar().parse("# bug : padded"), None);
}

#[test]
fn overlong_type_is_inert() {
    let line = format!("# {}: message", "x".repeat(65));
    assert_eq!(grammar().parse(&line), None);
}

// ---------------------------------------------------------------------------
// Prefix priority
// ---------------------------------------------------------------------------

#[test]
fn prefix_order_is_the_documented_contract() {
    assert_eq!(COMMENT_PREFIXES, ["#", "//", "%", "--", "'", ";"]);
}

#[test]
fn first_matching_prefix_wins() {
    // A '#' line whose message contains another prefix still parses as '#'.
    let m = grammar().parse("# bug: see // the other note").expect("marker");
    assert_eq!(m.prefix, "#");
    assert_eq!(m.message, "see // the other note");
}
