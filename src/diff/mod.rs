//! Unified diff parsing for ruff-format-changes.
//!
//! Turns the output of `git diff <base> -- <file>` into the line ranges of the
//! new file that were added or modified. Those ranges are what the formatter
//! is allowed to touch.
//!
//! The parser handles a single file's diff:
//! - Hunk headers with or without line counts (`@@ -a[,b] +c[,d] @@ ...`)
//! - File headers and other preamble before the first hunk (ignored)
//! - Deleted lines, which occupy no position in the new file

mod parser;
mod types;


pub use parser::extract_line_ranges;
pub use types::{FileChanges, LineRange};
