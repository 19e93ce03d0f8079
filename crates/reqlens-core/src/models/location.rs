use serde::{Deserialize, Serialize};

/// Position of a declaration inside a source file, anchoring UI affordances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path of the originating document
    pub file: String,
    /// 1-based line of the declaration
    pub line: usize,
    /// 0-based character offset of the declaration on that line
    pub column: usize,
}

impl Location {
    /// Creates a location pointing at the start of a line
    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Self::at(file, line, 0)
    }

    /// Creates a location pointing at a character on a line
    pub fn at(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}
