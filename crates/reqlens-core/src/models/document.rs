use std::fs;
use std::io;
use std::path::Path;

/// Source document handed to the scanner and resolver.
///
/// Carries the text together with the path it came from so results can be
/// anchored back to a file without re-reading it.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path the text was read from (or the editor buffer identity)
    pub path: String,
    /// Full document text
    pub text: String,
}

impl Document {
    /// Creates a document from already-loaded text
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads a document from disk
    pub fn read(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            text,
        })
    }

    /// Lines of the document text
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}
