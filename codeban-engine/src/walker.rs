//! Tree walker — lazy depth-first file traversal with a pruning predicate.
//!
//! The predicate is applied to absolute paths. A directory failing it is
//! pruned whole: its contents are never visited even if individual children
//! would pass. Entries are visited in name order so traversal is
//! deterministic. The walk is single-pass and lazy; restarting requires a
//! fresh [`Walk`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Lazy walk
// ---------------------------------------------------------------------------

/// Lazy depth-first iterator over the files under a root.
pub struct Walk<F> {
    stack: Vec<PathBuf>,
    filter: F,
}

impl<F: Fn(&Path) -> bool> Walk<F> {
    /// Walk the tree rooted at `root`. A non-directory root yields itself if
    /// it passes the predicate; a directory root is always entered (the
    /// predicate governs its children).
    pub fn new(root: &Path, filter: F) -> Self {
        let mut stack = Vec::new();
        if root.is_dir() || filter(root) {
            stack.push(root.to_path_buf());
        }
        Self { stack, filter }
    }
}

impl<F: Fn(&Path) -> bool> Iterator for Walk<F> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(path) = self.stack.pop() {
            if !path.is_dir() {
                return Some(path);
            }
            let Ok(entries) = std::fs::read_dir(&path) else {
                tracing::debug!("skipping unreadable directory {}", path.display());
                continue;
            };
            let mut children: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| (self.filter)(p))
                .collect();
            children.sort();
            // Reverse so the stack pops in name order.
            self.stack.extend(children.into_iter().rev());
        }
        None
    }
}

/// Walk with the default accept-everything predicate.
pub fn walk_all(root: &Path) -> Walk<fn(&Path) -> bool> {
    Walk::new(root, |_| true)
}

// ---------------------------------------------------------------------------
// Exclusion predicate
// ---------------------------------------------------------------------------

/// Predicate excluding the project's declared ignored paths plus any extra
/// names (version-control metadata). Paths are matched exactly, rooted at
/// the checkout, so pruning takes out whole subtrees.
pub fn exclusion_filter(
    root: &Path,
    ignored: &[String],
    extra: &[&str],
) -> impl Fn(&Path) -> bool {
    let excluded: HashSet<PathBuf> = ignored
        .iter()
        .map(String::as_str)
        .chain(extra.iter().copied())
        .map(|p| root.join(p))
        .collect();
    move |path: &Path| !excluded.contains(path)
}

// ---------------------------------------------------------------------------
// Tree view
// ---------------------------------------------------------------------------

/// A node in the presentation tree. `path` is relative to the traversal
/// root; directories carry `children` (name-ordered, pruned), files don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsNode {
    pub name: String,
    pub path: PathBuf,
    pub children: Option<Vec<FsNode>>,
}

/// Build the presentation tree under `root` with the same pruning rules as
/// [`Walk`].
pub fn tree_view<F: Fn(&Path) -> bool>(root: &Path, filter: &F) -> std::io::Result<FsNode> {
    build_node(root, root, filter)
}

fn build_node<F: Fn(&Path) -> bool>(
    root: &Path,
    path: &Path,
    filter: &F,
) -> std::io::Result<FsNode> {
    let name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned();
    let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();

    if !path.is_dir() {
        return Ok(FsNode {
            name,
            path: rel,
            children: None,
        });
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| filter(p))
        .collect();
    entries.sort();

    let mut children = Vec::with_capacity(entries.len());
    for entry in entries {
        children.push(build_node(root, &entry, filter)?);
    }

    Ok(FsNode {
        name,
        path: rel,
        children: Some(children),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().expect("tempdir");
        fs::create_dir_all(tmp.path().join("src/nested")).unwrap();
        fs::create_dir_all(tmp.path().join("vendor/lib")).unwrap();
        fs::write(tmp.path().join("README.md"), "readme").unwrap();
        fs::write(tmp.path().join("src/main.py"), "pass").unwrap();
        fs::write(tmp.path().join("src/nested/util.py"), "pass").unwrap();
        fs::write(tmp.path().join("vendor/lib/dep.py"), "pass").unwrap();
        tmp
    }

    fn rel_names(root: &Path, paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn walks_files_in_name_order() {
        let tmp = fixture();
        let files: Vec<_> = walk_all(tmp.path()).collect();
        assert_eq!(
            rel_names(tmp.path(), files),
            vec![
                "README.md",
                "src/main.py",
                "src/nested/util.py",
                "vendor/lib/dep.py"
            ]
        );
    }

    #[test]
    fn failing_directory_is_pruned_whole() {
        let tmp = fixture();
        let filter = exclusion_filter(tmp.path(), &["vendor".to_string()], &[]);
        let files: Vec<_> = Walk::new(tmp.path(), filter).collect();
        let names = rel_names(tmp.path(), files);
        assert!(!names.iter().any(|n| n.starts_with("vendor")));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn file_root_yields_itself_when_passing() {
        let tmp = fixture();
        let file = tmp.path().join("README.md");
        let files: Vec<_> = Walk::new(&file, |_| true).collect();
        assert_eq!(files, vec![file.clone()]);

        let none: Vec<_> = Walk::new(&file, |_| false).collect();
        assert!(none.is_empty());
    }

    #[test]
    fn walk_is_lazy_and_single_pass() {
        let tmp = fixture();
        let mut walk = walk_all(tmp.path());
        let first = walk.next().expect("first file");
        assert!(first.ends_with("README.md"));
        // Consuming the rest leaves nothing to restart.
        assert_eq!(walk.count(), 3);
    }

    #[test]
    fn tree_view_prunes_and_orders() {
        let tmp = fixture();
        let filter = exclusion_filter(tmp.path(), &["vendor".to_string()], &[]);
        let tree = tree_view(tmp.path(), &filter).expect("tree");
        let children = tree.children.expect("root is a directory");
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "src"]);

        let src = &children[1];
        assert_eq!(src.path, PathBuf::from("src"));
        let src_children = src.children.as_ref().expect("src is a directory");
        assert_eq!(src_children[0].name, "main.py");
        assert_eq!(src_children[0].path, PathBuf::from("src/main.py"));
        assert!(src_children[0].children.is_none());
    }
}
