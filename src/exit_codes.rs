//! Exit code constants for the ruff-format-changes CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, not in a repository, bad config, formatter missing)
//! - 2: Formatter failure (formatter reported an error or timed out)
//! - 3: Git operation failure
//! - 4: Diff could not be parsed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or missing tools.
pub const USER_ERROR: i32 = 1;

/// Formatter failure: the formatter reported an error or exceeded its timeout.
pub const FORMATTER_FAILURE: i32 = 2;

/// Git operation failure: diff, ls-files, or rev-parse errors.
pub const GIT_FAILURE: i32 = 3;

/// Diff parse failure: a hunk header carried an unusable line number.
pub const PARSE_FAILURE: i32 = 4;
