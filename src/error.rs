//! Error types for the ruff-format-changes CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for ruff-format-changes operations.
///
/// Each variant maps to a specific exit code (see [`exit_codes`]).
#[derive(Error, Debug)]
pub enum FormatChangesError {
    /// User provided invalid arguments or the environment is unusable.
    #[error("{0}")]
    UserError(String),

    /// The formatter reported an error or did not finish in time.
    #[error("Formatter failed: {0}")]
    FormatterError(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// A recognized hunk header carried a new-file start that is not a valid line number.
    ///
    /// Only aborts extraction for the file being parsed; callers skip that file.
    #[error("malformed hunk header '{line}': invalid new-file start '{value}'")]
    MalformedHunkHeader { line: String, value: String },
}

impl FormatChangesError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FormatChangesError::UserError(_) => exit_codes::USER_ERROR,
            FormatChangesError::FormatterError(_) => exit_codes::FORMATTER_FAILURE,
            FormatChangesError::GitError(_) => exit_codes::GIT_FAILURE,
            FormatChangesError::MalformedHunkHeader { .. } => exit_codes::PARSE_FAILURE,
        }
    }
}

/// Result type alias for ruff-format-changes operations.
pub type Result<T> = std::result::Result<T, FormatChangesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = FormatChangesError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn formatter_error_has_correct_exit_code() {
        let err = FormatChangesError::FormatterError("error: invalid syntax".to_string());
        assert_eq!(err.exit_code(), exit_codes::FORMATTER_FAILURE);
    }

    #[test]
    fn git_error_has_correct_exit_code() {
        let err = FormatChangesError::GitError("diff failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
    }

    #[test]
    fn malformed_hunk_header_has_correct_exit_code() {
        let err = FormatChangesError::MalformedHunkHeader {
            line: "@@ -1 +x @@".to_string(),
            value: "x".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::PARSE_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = FormatChangesError::GitError("git diff failed".to_string());
        assert_eq!(err.to_string(), "Git operation failed: git diff failed");

        let err = FormatChangesError::MalformedHunkHeader {
            line: "@@ -1 +99999999999999999999999 @@".to_string(),
            value: "99999999999999999999999".to_string(),
        };
        assert!(err.to_string().contains("malformed hunk header"));
        assert!(err.to_string().contains("99999999999999999999999"));
    }
}
