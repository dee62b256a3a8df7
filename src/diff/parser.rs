//! Core diff parsing logic.

use crate::error::{FormatChangesError, Result};
use regex::Regex;
use std::sync::LazyLock;

use super::types::LineRange;

/// Hunk header: `@@ -old_start[,old_len] +new_start[,new_len] @@ optional context`.
static HUNK_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -\d+(?:,\d+)? \+(\d+)(?:,(\d+))? @@").expect("Invalid hunk header regex")
});

/// Scan state shared by the hunk and body handlers.
#[derive(Default)]
struct RangeScanner {
    ranges: Vec<LineRange>,
    /// New-file line number the next body line refers to; 0 while outside any hunk.
    current_new_line: usize,
    /// Start of the open run of added lines.
    open_block: Option<usize>,
}

impl RangeScanner {
    fn enter_hunk(&mut self, new_start: usize) {
        self.close_block();
        self.current_new_line = new_start;
        self.open_block = None;
    }

    fn in_hunk(&self) -> bool {
        self.current_new_line != 0
    }

    /// Returns false when the line counter cannot advance past `usize::MAX`.
    fn added(&mut self) -> bool {
        if self.open_block.is_none() {
            self.open_block = Some(self.current_new_line);
        }
        self.advance()
    }

    fn context(&mut self) -> bool {
        self.close_block();
        self.advance()
    }

    fn advance(&mut self) -> bool {
        match self.current_new_line.checked_add(1) {
            Some(next) => {
                self.current_new_line = next;
                true
            }
            None => false,
        }
    }

    fn deleted(&mut self) {
        // Deleted lines don't exist in the new file: no advance.
        self.close_block();
    }

    fn close_block(&mut self) {
        if let Some(start) = self.open_block.take() {
            self.ranges.push(LineRange::new(start, self.current_new_line - 1));
        }
    }

    fn finish(mut self) -> Vec<LineRange> {
        self.close_block();
        self.ranges
    }
}

/// Extract the added/modified line ranges from one file's unified diff.
///
/// Each returned range is a maximal run of `+` lines, numbered in the new
/// file. Runs are broken by context lines, deleted lines and hunk headers.
/// Lines before the first hunk header are ignored, as are body lines that are
/// empty or start with anything other than `+`, `-` or a space (for example
/// `\ No newline at end of file`).
///
/// # Arguments
///
/// * `diff_text` - Raw unified diff output for a single file
///
/// # Returns
///
/// * `Ok(Vec<LineRange>)` - Ranges in increasing order (empty for an empty diff)
/// * `Err(FormatChangesError::MalformedHunkHeader)` - A hunk header's new-file
///   start does not fit a line number, or the hunk runs past the largest one
pub fn extract_line_ranges(diff_text: &str) -> Result<Vec<LineRange>> {
    let mut scanner = RangeScanner::default();
    let mut header: (&str, &str) = ("", "");

    for line in diff_text.lines() {
        if let Some(caps) = HUNK_HEADER_REGEX.captures(line) {
            let value = caps.get(1).map_or("", |m| m.as_str());
            let new_start = value
                .parse::<usize>()
                .map_err(|_| malformed_header(line, value))?;
            scanner.enter_hunk(new_start);
            header = (line, value);
            continue;
        }

        if !scanner.in_hunk() {
            continue;
        }

        let advanced = match line.as_bytes().first() {
            Some(b'+') => scanner.added(),
            Some(b' ') => scanner.context(),
            Some(b'-') => {
                scanner.deleted();
                true
            }
            // Empty lines and markers like "\ No newline at end of file".
            _ => true,
        };
        if !advanced {
            return Err(malformed_header(header.0, header.1));
        }
    }

    Ok(scanner.finish())
}

fn malformed_header(line: &str, value: &str) -> FormatChangesError {
    FormatChangesError::MalformedHunkHeader {
        line: line.to_string(),
        value: value.to_string(),
    }
}
