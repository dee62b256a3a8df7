//! Value types produced by diff parsing.

use serde::Serialize;

/// An inclusive, 1-based interval of line numbers in the new version of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start >= 1 && start <= end, "invalid line range {start}..={end}");
        Self { start, end }
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

/// The changed line ranges of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChanges {
    /// Repository-relative file path.
    pub file_path: String,
    /// Ranges in increasing order, never overlapping or touching.
    pub line_ranges: Vec<LineRange>,
}
