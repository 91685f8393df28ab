//! Marker grammar for `codeban-marker`.
//!
//! A marker is a single comment line of one of three shapes:
//!
//! ```text
//! <prefix> <type>: <message>                    (bare — not yet tracked)
//! <prefix> <type>: [<id8>] <message>            (tracked, active)
//! <prefix> <type>: [^<id8>] <message>           (tracked, completed)
//! ```
//!
//! Comment prefixes are tried in a fixed priority order and the first prefix
//! whose bare pattern matches the trimmed line wins — first-match-wins, not
//! longest-match, so the ordering of [`COMMENT_PREFIXES`] is part of the
//! contract. For the winning prefix the three shapes are tried most-specific
//! first. Lines matching none of them are inert and copied through unchanged.

use regex::Regex;

// ---------------------------------------------------------------------------
// Public constants
// ---------------------------------------------------------------------------

/// Recognized comment prefixes, in priority order.
pub const COMMENT_PREFIXES: [&str; 6] = ["#", "//", "%", "--", "'", ";"];

/// Upper bound on a todo type name. Longer matches are treated as inert
/// rather than corrupting the type table.
pub const TYPE_NAME_MAX: usize = 64;

// ---------------------------------------------------------------------------
// Parsed marker
// ---------------------------------------------------------------------------

/// A transient parse of one marker line. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The winning comment prefix.
    pub prefix: &'static str,
    pub type_name: String,
    /// `None` for a bare marker that has not been assigned an id yet.
    pub id: Option<String>,
    /// Whether the id carried the completion sigil (`[^id]`).
    pub completed: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

struct Rule {
    prefix: &'static str,
    completed: Regex,
    active: Regex,
    bare: Regex,
}

/// Compiled marker grammar: one [`Rule`] per comment prefix, in priority order.
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let rules = COMMENT_PREFIXES
            .iter()
            .map(|&prefix| {
                let p = regex::escape(prefix);
                Rule {
                    prefix,
                    completed: Regex::new(&format!(
                        r"^{p} ([^:]+): \[\^([a-z0-9]{{8}})\] (.+)$"
                    ))
                    .expect("static marker pattern"),
                    active: Regex::new(&format!(r"^{p} ([^:]+): \[([a-z0-9]{{8}})\] (.+)$"))
                        .expect("static marker pattern"),
                    bare: Regex::new(&format!(r"^{p} ([^:]+): (.+)$"))
                        .expect("static marker pattern"),
                }
            })
            .collect();
        Self { rules }
    }

    /// Parse one raw source line. Leading/trailing whitespace is ignored for
    /// matching; callers keep the raw line around for rewriting.
    ///
    /// Returns `None` for inert lines, including matches whose type name is
    /// empty, carries surrounding whitespace, or exceeds [`TYPE_NAME_MAX`].
    pub fn parse(&self, raw_line: &str) -> Option<Marker> {
        let line = raw_line.trim();

        // First prefix whose bare shape matches wins; the id-tagged shapes
        // are strict refinements of it.
        let rule = self.rules.iter().find(|r| r.bare.is_match(line))?;

        let marker = if let Some(caps) = rule.completed.captures(line) {
            Marker {
                prefix: rule.prefix,
                type_name: caps[1].to_owned(),
                id: Some(caps[2].to_owned()),
                completed: true,
                message: caps[3].to_owned(),
            }
        } else if let Some(caps) = rule.active.captures(line) {
            Marker {
                prefix: rule.prefix,
                type_name: caps[1].to_owned(),
                id: Some(caps[2].to_owned()),
                completed: false,
                message: caps[3].to_owned(),
            }
        } else {
            let caps = rule.bare.captures(line)?;
            Marker {
                prefix: rule.prefix,
                type_name: caps[1].to_owned(),
                id: None,
                completed: false,
                message: caps[2].to_owned(),
            }
        };

        if !valid_type_name(&marker.type_name) {
            return None;
        }
        Some(marker)
    }
}

fn valid_type_name(name: &str) -> bool {
    !name.is_empty() && name == name.trim() && name.len() <= TYPE_NAME_MAX
}

// ---------------------------------------------------------------------------
// Line synthesis helpers
// ---------------------------------------------------------------------------

/// Rewrite a bare marker line to carry `[<id>]` immediately after the
/// type/colon separator, preserving everything else byte-for-byte.
pub fn inject_id(raw_line: &str, marker: &Marker, id: &str) -> String {
    // Position just past "<prefix> <type>: " in the raw (untrimmed) line.
    let start = raw_line.find(marker.prefix).unwrap_or(0);
    let insert_at = start + marker.prefix.len() + 1 + marker.type_name.len() + 2;
    format!(
        "{}[{id}] {}",
        &raw_line[..insert_at],
        &raw_line[insert_at..]
    )
}

/// Synthesize a complete marker line for manual todo creation.
pub fn render_marker(
    whitespace: &str,
    prefix: &str,
    type_name: &str,
    id: &str,
    message: &str,
) -> String {
    format!("{whitespace}{prefix} {type_name}: [{id}] {message}")
}

/// Comment prefix for a file extension; unknown extensions default to `#`.
pub fn comment_prefix_for(extension: &str) -> &'static str {
    match extension {
        "py" | "sh" | "rb" | "pl" | "yml" | "yaml" | "toml" => "#",
        "rs" | "js" | "ts" | "jsx" | "tsx" | "c" | "cc" | "cpp" | "h" | "hpp" | "go" | "java"
        | "kt" | "swift" | "php" | "cs" | "scala" | "dart" => "//",
        "tex" | "m" | "erl" => "%",
        "sql" | "lua" | "hs" | "elm" => "--",
        "vb" | "vbs" | "bas" => "'",
        "asm" | "s" | "ini" | "lisp" | "clj" | "scm" | "el" => ";",
        _ => "#",
    }
}

/// The leading whitespace run of a line, used to match indentation when
/// inserting a synthesized marker.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_preserves_indentation_and_message() {
        let g = Grammar::new();
        let raw = "    # bug: fix the gizmo";
        let m = g.parse(raw).expect("bare marker");
        assert_eq!(
            inject_id(raw, &m, "ab12cd34"),
            "    # bug: [ab12cd34] fix the gizmo"
        );
    }

    #[test]
    fn inject_handles_double_char_prefix() {
        let g = Grammar::new();
        let raw = "\t// todo: refactor";
        let m = g.parse(raw).expect("bare marker");
        assert_eq!(inject_id(raw, &m, "zz99yy88"), "\t// todo: [zz99yy88] refactor");
    }

    #[test]
    fn render_marker_shape() {
        assert_eq!(
            render_marker("  ", "//", "bug", "ab12cd34", "broken"),
            "  // bug: [ab12cd34] broken"
        );
    }

    #[test]
    fn unknown_extension_defaults_to_hash() {
        assert_eq!(comment_prefix_for("xyz"), "#");
        assert_eq!(comment_prefix_for("rs"), "//");
        assert_eq!(comment_prefix_for("sql"), "--");
    }

    #[test]
    fn leading_whitespace_runs() {
        assert_eq!(leading_whitespace("    x"), "    ");
        assert_eq!(leading_whitespace("\t\tx"), "\t\t");
        assert_eq!(leading_whitespace("x"), "");
        assert_eq!(leading_whitespace("   "), "   ");
    }
}
