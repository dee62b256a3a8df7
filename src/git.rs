//! Git command runner for ruff-format-changes.
//!
//! Provides a wrapper around git commands with captured stdout/stderr
//! and structured error handling. All git operations should go through this module.

use crate::error::{FormatChangesError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }
}

fn execute_git(cwd: &Path, args: &[&str]) -> Result<Output> {
    tracing::debug!(cwd = %cwd.display(), "running git {}", args.join(" "));

    Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            FormatChangesError::GitError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })
}

fn failure(args: &[&str], output: &Output) -> FormatChangesError {
    let git_output = GitOutput::from_output(output);
    let exit_code = output.status.code().unwrap_or(-1);
    let error_msg = if git_output.stderr.is_empty() {
        git_output.stdout
    } else {
        git_output.stderr
    };

    FormatChangesError::GitError(format!(
        "git {} failed (exit code {}): {}",
        args.first().unwrap_or(&""),
        exit_code,
        error_msg
    ))
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(FormatChangesError::GitError)` - On non-zero exit code (mapped to exit code 3)
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = execute_git(cwd.as_ref(), args)?;

    if output.status.success() {
        Ok(GitOutput::from_output(&output))
    } else {
        Err(failure(args, &output))
    }
}

/// Run a git command and return stdout exactly as git printed it.
///
/// Used for diff text, where leading and trailing whitespace belong to
/// context lines.
pub fn run_git_raw<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<String> {
    let output = execute_git(cwd.as_ref(), args)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(failure(args, &output))
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute path to the repository root
/// * `Err(FormatChangesError::UserError)` - If not inside a git repository (exit code 1)
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let output = run_git_for_repo_detection(cwd.as_ref(), &["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(&output.stdout))
}

/// Returns a UserError instead of GitError so that "not in a git repo" exits with 1.
fn run_git_for_repo_detection(cwd: &Path, args: &[&str]) -> Result<GitOutput> {
    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            FormatChangesError::UserError(format!(
                "failed to execute git: {} (is git installed?)",
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let stderr = &git_output.stderr;
        if stderr.contains("not a git repository") || stderr.contains("fatal:") {
            Err(FormatChangesError::UserError(
                "not inside a git repository. Run this command from within a git repository."
                    .to_string(),
            ))
        } else {
            Err(FormatChangesError::UserError(format!(
                "git command failed: {}",
                if stderr.is_empty() {
                    &git_output.stdout
                } else {
                    stderr
                }
            )))
        }
    }
}

/// Get the name of the checked-out branch (`HEAD` when detached).
pub fn current_branch<P: AsRef<Path>>(cwd: P) -> Result<String> {
    let output = run_git(cwd, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(output.stdout)
}

/// Check whether `branch` resolves to a commit.
pub fn branch_exists<P: AsRef<Path>>(cwd: P, branch: &str) -> bool {
    run_git(cwd, &["rev-parse", "--verify", "--quiet", branch]).is_ok()
}

/// Default branch advertised by `origin`, from `refs/remotes/origin/HEAD`.
///
/// Returns `None` when there is no origin remote or its HEAD is unknown.
pub fn remote_default_branch<P: AsRef<Path>>(cwd: P) -> Option<String> {
    let output = run_git(cwd, &["symbolic-ref", "refs/remotes/origin/HEAD"]).ok()?;
    output
        .stdout
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Raw `git show-branch` output, or `None` if the command fails.
pub fn show_branch<P: AsRef<Path>>(cwd: P) -> Option<String> {
    run_git(cwd, &["show-branch"]).ok().map(|output| output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_repo, git};
    use tempfile::TempDir;

    #[test]
    fn test_run_git_success() {
        let temp_dir = create_test_repo();
        let result = run_git(temp_dir.path(), &["status", "--porcelain"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_git_failure_returns_git_error() {
        let temp_dir = create_test_repo();
        let result = run_git(temp_dir.path(), &["checkout", "nonexistent-branch"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, FormatChangesError::GitError(_)));
    }

    #[test]
    fn test_run_git_raw_keeps_trailing_newline() {
        let temp_dir = create_test_repo();
        let stdout = run_git_raw(temp_dir.path(), &["rev-parse", "--abbrev-ref", "HEAD"]).unwrap();
        assert_eq!(stdout, "main\n");
    }

    #[test]
    fn test_get_repo_root_from_subdirectory() {
        let temp_dir = create_test_repo();
        let subdir = temp_dir.path().join("subdir").join("nested");
        std::fs::create_dir_all(&subdir).unwrap();

        let root = get_repo_root(&subdir).unwrap();
        let expected = temp_dir.path().canonicalize().unwrap();
        assert_eq!(root.canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_get_repo_root_outside_repo_returns_user_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = get_repo_root(temp_dir.path()).unwrap_err();
        assert!(matches!(err, FormatChangesError::UserError(_)));
        assert!(err.to_string().contains("not inside a git repository"));
    }

    #[test]
    fn test_current_branch() {
        let temp_dir = create_test_repo();
        assert_eq!(current_branch(temp_dir.path()).unwrap(), "main");

        git(temp_dir.path(), &["checkout", "-b", "feature/x"]);
        assert_eq!(current_branch(temp_dir.path()).unwrap(), "feature/x");
    }

    #[test]
    fn test_branch_exists() {
        let temp_dir = create_test_repo();
        assert!(branch_exists(temp_dir.path(), "main"));
        assert!(!branch_exists(temp_dir.path(), "no-such-branch"));
    }

    #[test]
    fn test_remote_default_branch_without_remote() {
        let temp_dir = create_test_repo();
        assert_eq!(remote_default_branch(temp_dir.path()), None);
    }

    #[test]
    fn test_remote_default_branch_from_origin_head() {
        let temp_dir = create_test_repo();
        let path = temp_dir.path();
        git(path, &["update-ref", "refs/remotes/origin/trunk", "HEAD"]);
        git(
            path,
            &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/trunk"],
        );
        assert_eq!(remote_default_branch(path), Some("trunk".to_string()));
    }

    #[test]
    fn test_git_output_lines() {
        let output = GitOutput {
            stdout: "line1\nline2\nline3".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.lines(), vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_git_output_lines_empty() {
        let output = GitOutput {
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(output.lines().is_empty());
        assert!(output.is_empty());
    }
}
