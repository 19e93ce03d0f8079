use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories never worth searching for type declarations
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git", ".vs", "node_modules", "packages"];

/// How many files a single resolution pass may examine.
///
/// Workspace search is linear and runs on every unresolved type, so the
/// ceiling is what keeps worst-case latency bounded on big monorepos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Small projects, snappiest feedback
    Fast,
    /// Default for typical solutions
    Balanced,
    /// Large monorepos where misses are worse than waiting
    Thorough,
    /// Explicit ceiling
    Custom(usize),
}

impl SearchScope {
    /// Maximum number of files one pass may read
    pub fn file_ceiling(&self) -> usize {
        match self {
            SearchScope::Fast => 500,
            SearchScope::Balanced => 2_000,
            SearchScope::Thorough => 10_000,
            SearchScope::Custom(n) => *n,
        }
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        SearchScope::Balanced
    }
}

impl std::str::FromStr for SearchScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("fast") {
            Ok(SearchScope::Fast)
        } else if s.eq_ignore_ascii_case("balanced") {
            Ok(SearchScope::Balanced)
        } else if s.eq_ignore_ascii_case("thorough") {
            Ok(SearchScope::Thorough)
        } else {
            Err(())
        }
    }
}

/// Source of searchable workspace files.
///
/// A trait so hosts can swap the real filesystem for an editor's open-buffer
/// set, and so tests can count how often a search pass actually runs.
pub trait WorkspaceFiles {
    /// Candidate C# files in search order
    fn enumerate(&self) -> Vec<PathBuf>;

    /// Reads one file's text
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Filesystem-backed workspace rooted at a directory
pub struct FsWorkspace {
    root: PathBuf,
    scope: SearchScope,
}

impl FsWorkspace {
    /// Creates a workspace over `root` with the default scope
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scope: SearchScope::default(),
        }
    }

    /// Sets the search scope
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    fn collect(dir: &Path, files: &mut Vec<PathBuf>, ceiling: usize) {
        if files.len() >= ceiling {
            return;
        }

        if dir.is_file() {
            if dir.extension().is_some_and(|ext| ext == "cs") {
                files.push(dir.to_path_buf());
            }
            return;
        }

        if !dir.is_dir() {
            return;
        }
        if dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
        {
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        // Sorted so "first declaration wins" is reproducible across runs
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        for path in paths {
            if files.len() >= ceiling {
                return;
            }
            Self::collect(&path, files, ceiling);
        }
    }
}

impl WorkspaceFiles for FsWorkspace {
    fn enumerate(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::collect(&self.root, &mut files, self.scope.file_ceiling());
        files
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
