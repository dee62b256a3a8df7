//! Base branch detection.
//!
//! When no `--base` is given, the base is chosen in this order:
//! 1. The parent branch reported by `git show-branch`
//! 2. The first configured candidate that exists and is not the current branch
//! 3. The default branch of `origin`, if it exists locally and is not current
//! 4. The configured fallback

use crate::config::Config;
use crate::git::{branch_exists, remote_default_branch, show_branch};
use std::path::Path;
use tracing::debug;

/// Pick the branch to diff against.
pub fn determine_base_branch(repo_root: &Path, current: &str, config: &Config) -> String {
    if let Some(parent) = find_parent_branch(repo_root, current) {
        debug!(branch = %parent, "using parent branch from show-branch");
        return parent;
    }

    for candidate in &config.base_branch_candidates {
        if candidate == current {
            continue;
        }
        if branch_exists(repo_root, candidate) {
            debug!(branch = %candidate, "using first existing candidate branch");
            return candidate.clone();
        }
    }

    if let Some(default) = remote_default_branch(repo_root)
        && default != current
        && branch_exists(repo_root, &default)
    {
        debug!(branch = %default, "using origin default branch");
        return default;
    }

    config.fallback_base_branch.clone()
}

/// Nearest ancestor branch of `current` according to `git show-branch`.
pub fn find_parent_branch(repo_root: &Path, current: &str) -> Option<String> {
    let output = show_branch(repo_root)?;
    parse_parent_branch(&output, current)
}

/// Pick the parent branch out of `git show-branch` output.
///
/// The header lines above the `--` separator list one branch each, indented
/// by its column. The parent is the other branch with the greatest
/// indentation still left of the current branch's. If there is none, the
/// first other branch listed is used.
pub fn parse_parent_branch(output: &str, current: &str) -> Option<String> {
    let lines: Vec<&str> = output.trim().lines().collect();
    let separator = lines.iter().position(|line| line.starts_with("--"))?;
    let header = &lines[..separator];

    let branches: Vec<(usize, &str)> = header
        .iter()
        .filter_map(|line| Some((indentation(line), extract_branch_name(line)?)))
        .collect();

    let current_indent = branches
        .iter()
        .find(|(_, name)| *name == current)
        .map(|(indent, _)| *indent);

    let mut closest: Option<(usize, &str)> = None;
    if let Some(current_indent) = current_indent {
        for &(indent, name) in &branches {
            if name == current || indent >= current_indent {
                continue;
            }
            if closest.is_none_or(|(best, _)| indent > best) {
                closest = Some((indent, name));
            }
        }
    }

    closest
        .map(|(_, name)| name)
        .or_else(|| {
            branches
                .iter()
                .map(|(_, name)| *name)
                .find(|name| *name != current)
        })
        .map(str::to_string)
}

/// Branch name inside the first `[...]` of a show-branch line, without `^`/`~` suffixes.
pub fn extract_branch_name(line: &str) -> Option<&str> {
    let start = line.find('[')?;
    let end = line.find(']')?;
    if start >= end {
        return None;
    }

    let info = &line[start + 1..end];
    let name = match info.find(['^', '~']) {
        Some(pos) => &info[..pos],
        None => info,
    };
    if name.is_empty() { None } else { Some(name) }
}

fn indentation(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}
