//! Changed files and their changed line ranges relative to a base branch.
//!
//! Tracked files are diffed against the base and run through the diff
//! parser. Untracked files have no prior version, so the whole file counts
//! as changed.

use crate::diff::{FileChanges, LineRange, extract_line_ranges};
use crate::error::{FormatChangesError, Result};
use crate::filter::FileFilter;
use crate::git::{run_git, run_git_raw};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// List files changed against `base` plus untracked files, filtered and sorted.
///
/// Combines `git diff --name-only {base}` with
/// `git ls-files --others --exclude-standard`. A failure to list untracked
/// files is logged and otherwise ignored.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Repo-relative paths, deduplicated and sorted
/// * `Err(FormatChangesError::GitError)` - The tracked diff listing failed
pub fn changed_files(repo_root: &Path, base: &str, filter: &FileFilter) -> Result<Vec<String>> {
    let mut files = BTreeSet::new();

    let tracked = run_git(repo_root, &["diff", "--name-only", base])?;
    files.extend(
        tracked
            .lines()
            .into_iter()
            .filter(|f| filter.matches(f))
            .map(str::to_string),
    );

    match run_git(repo_root, &["ls-files", "--others", "--exclude-standard"]) {
        Ok(untracked) => files.extend(
            untracked
                .lines()
                .into_iter()
                .filter(|f| filter.matches(f))
                .map(str::to_string),
        ),
        Err(e) => warn!("could not get untracked files: {}", e),
    }

    if files.is_empty() {
        debug!("no changed files found");
    }

    Ok(files.into_iter().collect())
}

/// True if `rel_path` is untracked (and not ignored).
pub fn is_untracked(repo_root: &Path, rel_path: &str) -> Result<bool> {
    let output = run_git(
        repo_root,
        &["ls-files", "--others", "--exclude-standard", "--", rel_path],
    )?;
    Ok(!output.is_empty())
}

/// Count the lines of a file; a final line without a trailing newline still counts.
pub fn count_lines(path: &Path) -> Result<usize> {
    let content = std::fs::read(path).map_err(|e| {
        FormatChangesError::UserError(format!(
            "failed to count lines in '{}': {}",
            path.display(),
            e
        ))
    })?;

    let newlines = content.iter().filter(|&&b| b == b'\n').count();
    let unterminated = !content.is_empty() && content.last() != Some(&b'\n');
    Ok(newlines + usize::from(unterminated))
}

/// Changed line ranges of one file relative to `base`.
///
/// Untracked files yield a single range over the whole file (or nothing if
/// the file is empty). Tracked files are parsed from `git diff {base} -- {path}`.
pub fn file_line_ranges(repo_root: &Path, base: &str, rel_path: &str) -> Result<Vec<LineRange>> {
    let untracked = is_untracked(repo_root, rel_path).unwrap_or_else(|e| {
        warn!("could not determine if {} is untracked: {}", rel_path, e);
        false
    });

    if untracked {
        let line_count = count_lines(&repo_root.join(rel_path))?;
        debug!(file = rel_path, lines = line_count, "untracked file, using whole file");
        if line_count == 0 {
            return Ok(Vec::new());
        }
        return Ok(vec![LineRange::new(1, line_count)]);
    }

    let diff = run_git_raw(repo_root, &["diff", base, "--", rel_path])?;
    extract_line_ranges(&diff)
}

/// Changed line ranges for every selected file.
///
/// Errors are isolated per file: a file whose ranges cannot be computed is
/// logged and skipped. Files without any changed lines are omitted.
pub fn changed_line_ranges(
    repo_root: &Path,
    base: &str,
    filter: &FileFilter,
) -> Result<Vec<FileChanges>> {
    let files = changed_files(repo_root, base, filter)?;
    let mut changes = Vec::with_capacity(files.len());

    for file in files {
        let line_ranges = match file_line_ranges(repo_root, base, &file) {
            Ok(ranges) => ranges,
            Err(e) => {
                warn!("could not get line ranges for {}: {}", file, e);
                continue;
            }
        };

        if line_ranges.is_empty() {
            debug!(file = %file, "no added lines");
            continue;
        }

        changes.push(FileChanges {
            file_path: file,
            line_ranges,
        });
    }

    Ok(changes)
}
