//! Line-range-scoped formatter invocation.
//!
//! Runs `<formatter> format [--check --diff] --range <range> <file>` once per
//! changed line range, with the repository root as working directory.

mod process;


use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::diff::{FileChanges, LineRange};
use crate::error::{FormatChangesError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use process::run_with_timeout;

/// Runs the configured formatter over changed line ranges.
#[derive(Debug, Clone)]
pub struct Formatter {
    program: String,
    leading_args: Vec<String>,
    repo_root: PathBuf,
    dry_run: bool,
    verbose: bool,
    timeout: Duration,
}

impl Formatter {
    pub fn new(config: &Config, repo_root: PathBuf, dry_run: bool, verbose: bool) -> Result<Self> {
        let mut words = config.formatter_command()?.into_iter();
        let program = words.next().ok_or_else(|| {
            FormatChangesError::UserError("formatter must not be empty".to_string())
        })?;

        Ok(Self {
            program,
            leading_args: words.collect(),
            repo_root,
            dry_run,
            verbose,
            timeout: Duration::from_secs(config.formatter_timeout_seconds),
        })
    }

    /// Verify the formatter can be executed (`<formatter> --version`).
    pub fn check_installed(&self) -> Result<()> {
        let mut args = self.leading_args.clone();
        args.push("--version".to_string());

        match run_with_timeout(&self.program, &args, &self.repo_root, self.timeout) {
            Ok(output) if output.success() => {
                debug!(version = %output.combined.trim(), "formatter found");
                Ok(())
            }
            _ => Err(FormatChangesError::UserError(missing_formatter_message(
                &self.program,
                &self.leading_args,
            ))),
        }
    }

    /// Join repo-relative paths onto the repository root.
    pub fn absolute_paths(&self, files: &[String]) -> Vec<PathBuf> {
        files.iter().map(|f| self.repo_root.join(f)).collect()
    }

    /// Arguments (after the program) for formatting `range` of `path`.
    pub fn range_args(&self, path: &Path, range: &LineRange) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.push("format".to_string());
        if self.dry_run {
            args.push("--check".to_string());
            args.push("--diff".to_string());
        }
        args.push("--range".to_string());
        args.push(format_range_arg(range));
        args.push(path.display().to_string());
        args
    }

    /// Format every range of every file, stopping at the first formatter error.
    pub fn format_file_changes(&self, changes: &[FileChanges]) -> Result<()> {
        if changes.is_empty() {
            if self.verbose {
                println!("No changed lines to format");
            }
            return Ok(());
        }

        if self.verbose {
            println!("Found {} file(s) with changed lines:", changes.len());
            print!("{}", render_summary(changes));
        }

        let files: Vec<String> = changes.iter().map(|fc| fc.file_path.clone()).collect();
        for (fc, abs_path) in changes.iter().zip(self.absolute_paths(&files)) {
            for range in &fc.line_ranges {
                self.format_range(&abs_path, range)?;
            }
        }

        if !self.dry_run && self.verbose {
            println!("\nSuccessfully formatted changed lines");
        }

        Ok(())
    }

    fn format_range(&self, path: &Path, range: &LineRange) -> Result<()> {
        let args = self.range_args(path, range);

        if self.verbose {
            println!("Running: {} {}", self.program, args.join(" "));
        }

        let output = run_with_timeout(&self.program, &args, &self.repo_root, self.timeout)
            .map_err(|e| {
                FormatChangesError::FormatterError(format!(
                    "failed to execute {}: {}",
                    self.program, e
                ))
            })?;

        if !output.combined.is_empty() {
            println!("{}", output.combined);
        }

        if output.timed_out {
            return Err(FormatChangesError::FormatterError(format!(
                "{} timed out after {}s on {} (range {})",
                self.program,
                self.timeout.as_secs(),
                path.display(),
                format_range_arg(range)
            )));
        }

        debug!(
            file = %path.display(),
            range = %format_range_arg(range),
            exit_code = ?output.exit_code(),
            "formatter finished"
        );

        check_outcome(self.dry_run, output.success(), &output.combined).map_err(|reason| {
            FormatChangesError::FormatterError(format!(
                "{} format failed on {} (exit code {}): {}",
                self.program,
                path.display(),
                output
                    .exit_code()
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                reason
            ))
        })
    }
}

/// Error text for a formatter whose `--version` call failed.
///
/// The pip hint only applies when ruff itself is the program; wrappers such as
/// `uvx ruff` get pointed at the config instead.
pub fn missing_formatter_message(program: &str, leading_args: &[String]) -> String {
    let is_ruff = Path::new(program)
        .file_stem()
        .is_some_and(|stem| stem == "ruff");
    if is_ruff {
        return format!("{} not found. Please install it with: pip install ruff", program);
    }

    let command = shell_words::join(
        std::iter::once(program).chain(leading_args.iter().map(String::as_str)),
    );
    format!(
        "formatter '{}' could not be run. Check the `formatter` setting in {}",
        command, DEFAULT_CONFIG_FILE
    )
}

/// Decide whether a finished formatter run counts as a failure.
///
/// A zero exit is success. With `--check`, a non-zero exit that reports files
/// "would be reformatted" is the expected result. Otherwise a non-zero exit
/// is only a failure when the output carries an `error:` diagnostic.
pub fn check_outcome(dry_run: bool, success: bool, output: &str) -> std::result::Result<(), String> {
    if success {
        return Ok(());
    }

    if dry_run && (output.contains("would be reformatted") || output.contains("would reformat")) {
        return Ok(());
    }

    match output.lines().find(|line| line.contains("error:")) {
        Some(line) => Err(line.trim().to_string()),
        None => Ok(()),
    }
}

/// Render a range for `--range`: `"12"` for one line, `"12:15"` otherwise.
pub fn format_range_arg(range: &LineRange) -> String {
    if range.is_single_line() {
        range.start.to_string()
    } else {
        format!("{}:{}", range.start, range.end)
    }
}

/// Human-readable form of a range: `Line 12` or `Lines 12-15`.
pub fn describe_range(range: &LineRange) -> String {
    if range.is_single_line() {
        format!("Line {}", range.start)
    } else {
        format!("Lines {}-{}", range.start, range.end)
    }
}

/// One `  - path` line per file followed by its indented ranges.
pub fn render_summary(changes: &[FileChanges]) -> String {
    let mut out = String::new();
    for fc in changes {
        out.push_str(&format!("  - {}\n", fc.file_path));
        for range in &fc.line_ranges {
            out.push_str(&format!("    {}\n", describe_range(range)));
        }
    }
    out
}
