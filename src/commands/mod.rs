//! The format-changes run.
//!
//! Resolves the repository, configuration and base branch, computes the
//! changed line ranges and hands them to the formatter (or lists them).

mod list;


use crate::base_branch::determine_base_branch;
use crate::changes::changed_line_ranges;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{FormatChangesError, Result};
use crate::filter::FileFilter;
use crate::formatter::Formatter;
use crate::git::{current_branch, get_repo_root};
use std::path::Path;

pub use list::{no_changes_message, render_listing};

/// Run from the process's current directory.
pub fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        FormatChangesError::UserError(format!("failed to determine current directory: {}", e))
    })?;
    run_in(&cwd, cli)
}

/// Run as if started from `cwd`.
pub fn run_in(cwd: &Path, cli: &Cli) -> Result<()> {
    let verbose = cli.verbose;

    if verbose {
        println!("Initializing Git repository...");
    }
    let repo_root = get_repo_root(cwd)?;

    let config_path = cli.config.as_deref().map(|p| cwd.join(p));
    let config = Config::discover(&repo_root, config_path.as_deref())?;

    let formatter = Formatter::new(&config, repo_root.clone(), cli.dry_run, verbose)?;
    if !cli.list {
        formatter.check_installed()?;
    }

    let current = current_branch(&repo_root)?;
    if verbose {
        println!("Current branch: {}", current);
    }

    let base = match &cli.base {
        Some(base) => base.clone(),
        None => {
            let base = determine_base_branch(&repo_root, &current, &config);
            if verbose {
                println!("Using base branch: {}", base);
            }
            base
        }
    };

    if verbose {
        println!("Comparing against branch: {}", base);
        println!("Getting changed lines...");
    }

    let filter = FileFilter::from_config(&config)?;
    let changes = changed_line_ranges(&repo_root, &base, &filter)?;

    if cli.list {
        print!("{}", render_listing(&changes, &config, cli.json)?);
        return Ok(());
    }

    if changes.is_empty() {
        println!("{}", no_changes_message(&config));
        return Ok(());
    }

    if verbose {
        println!();
    }

    if cli.dry_run {
        println!("Running {} format in dry-run mode (--check --diff)...", formatter_name(&config));
    } else {
        println!("Running {} format on changed lines...", formatter_name(&config));
    }
    println!();

    formatter.format_file_changes(&changes)
}

/// Name shown in the progress banner: `ruff` wherever it appears in the
/// command (`uv run ruff`), else the program itself. Flags never count.
fn formatter_name(config: &Config) -> String {
    let words = config.formatter_command().unwrap_or_default();
    let stem = |word: &String| {
        Path::new(word)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| word.clone())
    };

    words
        .iter()
        .filter(|word| !word.starts_with('-'))
        .map(stem)
        .find(|name| name == "ruff")
        .or_else(|| words.first().map(stem))
        .unwrap_or_else(|| config.formatter.clone())
}
