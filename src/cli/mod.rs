//! CLI argument parsing for ruff-format-changes.
//!
//! Uses clap derive macros for declarative argument definitions.
//! The run itself lives in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

/// Format only the changed lines in your Git branch using ruff.
///
/// Runs `ruff format --range` on the lines that changed in the current branch
/// compared to a base branch (usually main or master), plus untracked files.
/// This keeps new code formatted without reformatting the entire codebase.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ruff-format-changes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base branch to compare against (default: detected parent, then main or master).
    #[arg(long, value_name = "BRANCH")]
    pub base: Option<String>,

    /// Preview changes without modifying files (ruff format --check --diff).
    #[arg(long)]
    pub dry_run: bool,

    /// Show detailed output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a config file (default: .ruff-format-changes.yaml at the repository root).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the changed line ranges and exit without formatting.
    #[arg(long)]
    pub list: bool,

    /// With --list, print the ranges as JSON.
    #[arg(long, requires = "list")]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ruff-format-changes"]).unwrap();
        assert_eq!(cli.base, None);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(!cli.list);
        assert!(!cli.json);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "ruff-format-changes",
            "--base",
            "develop",
            "--dry-run",
            "--verbose",
            "--config",
            "fmt.yaml",
            "--list",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.base.as_deref(), Some("develop"));
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("fmt.yaml")));
        assert!(cli.list);
        assert!(cli.json);
    }

    #[test]
    fn test_json_requires_list() {
        assert!(Cli::try_parse_from(["ruff-format-changes", "--json"]).is_err());
    }

    #[test]
    fn test_base_requires_value() {
        assert!(Cli::try_parse_from(["ruff-format-changes", "--base"]).is_err());
    }
}
