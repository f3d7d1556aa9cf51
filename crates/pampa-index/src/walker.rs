//! Full-tree file walker for a non-incremental `indexProject` run.
//!
//! Respects `.gitignore`, always excludes `.pampa/` regardless of
//! ignore rules, and additionally skips the fixed set of
//! vendor/build directories the original spec names for the watcher
//! (§4.10) — applied here too so a full index run and a watch-driven
//! partial run agree on what counts as source.

use std::path::Path;

use ignore::WalkBuilder;
use pampa_core::Language;

/// Directory names always skipped, regardless of `.gitignore` content.
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".git", ".pampa", "dist", "build", "tmp", ".tmp", "vendor"];

/// Walk `root`, yielding the relative path of every file whose
/// extension [`Language::from_path`] recognizes.
pub fn walk_source_files(root: &Path) -> Vec<String> {
    let mut builder = WalkBuilder::new(root);
    builder.hidden(false);
    builder.filter_entry(|entry| {
        let file_name = entry.file_name().to_string_lossy();
        if entry.file_type().is_some_and(|ft| ft.is_dir()) && IGNORED_DIRS.contains(&file_name.as_ref()) {
            return false;
        }
        true
    });

    let mut paths = Vec::new();
    for entry in builder.build().filter_map(Result::ok) {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else { continue };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if Language::from_path(&relative).is_some() {
            paths.push(relative);
        }
    }
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(tmp: &Path) {
        let dirs = ["src", "node_modules/lodash", ".pampa/chunks", "vendor/deps", "dist"];
        for d in &dirs {
            fs::create_dir_all(tmp.join(d)).unwrap();
        }
        let files = [
            ("src/main.php", "<?php function f() {}"),
            ("src/util.py", "def f(): pass"),
            ("node_modules/lodash/index.js", "module.exports = {}"),
            (".pampa/chunks/deadbeef.gz", "binary"),
            ("vendor/deps/dep.php", "<?php"),
            ("dist/bundle.js", "//"),
            ("README.md", "# readme"),
        ];
        for (path, content) in &files {
            fs::write(tmp.join(path), content).unwrap();
        }
    }

    #[test]
    fn finds_source_files_and_skips_ignored_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        fixture(tmp.path());
        let files = walk_source_files(tmp.path());
        assert!(files.contains(&"src/main.php".to_string()));
        assert!(files.contains(&"src/util.py".to_string()));
        assert!(!files.iter().any(|f| f.starts_with("node_modules")));
        assert!(!files.iter().any(|f| f.starts_with(".pampa")));
        assert!(!files.iter().any(|f| f.starts_with("vendor")));
        assert!(!files.iter().any(|f| f.starts_with("dist")));
    }

    #[test]
    fn non_source_extensions_are_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        fixture(tmp.path());
        let files = walk_source_files(tmp.path());
        assert!(!files.iter().any(|f| f == "README.md"));
    }

    #[test]
    fn results_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        fixture(tmp.path());
        let files = walk_source_files(tmp.path());
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }
}
