//! Document discovery by filesystem walking.
//!
//! Discovery is separate from parsing: the scanner only finds markdown
//! files, and [`ContentStore`](crate::ContentStore) reads and parses them.

use std::fs;
use std::path::{Path, PathBuf};

/// Location of a markdown file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceRef {
    /// Path relative to the content directory.
    pub rel_path: PathBuf,
    /// Absolute path used for reading.
    pub abs_path: PathBuf,
}

/// Walks the content directory for `.md` and `.markdown` files.
///
/// Entries whose name starts with `.` or `_` are skipped, so authors can
/// keep partials and notes next to their posts.
pub(crate) struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Scan the content directory. Results are sorted by relative path.
    pub fn scan(&self) -> std::io::Result<Vec<SourceRef>> {
        let mut refs = Vec::new();
        self.scan_directory(&self.root, Path::new(""), &mut refs)?;
        refs.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(refs)
    }

    fn scan_directory(
        &self,
        dir: &Path,
        rel_dir: &Path,
        refs: &mut Vec<SourceRef>,
    ) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with('.') || name_str.starts_with('_') {
                continue;
            }

            let abs_path = entry.path();
            let rel_path = rel_dir.join(&name);

            if entry.file_type()?.is_dir() {
                self.scan_directory(&abs_path, &rel_path, refs)?;
            } else if is_markdown(&abs_path) {
                refs.push(SourceRef { rel_path, abs_path });
            }
        }
        Ok(())
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}
