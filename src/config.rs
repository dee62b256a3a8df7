//! Configuration model for ruff-format-changes.
//!
//! This module defines the Config struct that represents the optional
//! `.ruff-format-changes.yaml` at the repository root. It supports
//! forward-compatible YAML parsing (unknown fields are ignored), defaults for
//! every field, and validation of config values.

use crate::error::{FormatChangesError, Result};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up at the repository root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".ruff-format-changes.yaml";

/// Configuration for a formatting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Formatter program, optionally with leading arguments (shell-word split).
    pub formatter: String,

    /// File extensions to consider (no leading dots).
    pub extensions: Vec<String>,

    /// Glob patterns of repo-relative paths to skip.
    pub exclude: Vec<String>,

    /// Branches tried, in order, when no parent branch can be detected.
    pub base_branch_candidates: Vec<String>,

    /// Base branch used when nothing else can be detected.
    pub fallback_base_branch: String,

    /// Per-range formatter timeout.
    pub formatter_timeout_seconds: u64,
}

fn default_formatter() -> String {
    "ruff".to_string()
}
fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}
fn default_base_branch_candidates() -> Vec<String> {
    ["main", "master", "develop", "development"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_fallback_base_branch() -> String {
    "main".to_string()
}
fn default_formatter_timeout_seconds() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            formatter: default_formatter(),
            extensions: default_extensions(),
            exclude: Vec::new(),
            base_branch_candidates: default_base_branch_candidates(),
            fallback_base_branch: default_fallback_base_branch(),
            formatter_timeout_seconds: default_formatter_timeout_seconds(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(FormatChangesError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FormatChangesError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a repository.
    ///
    /// An explicit path must exist. Without one, `DEFAULT_CONFIG_FILE` at the
    /// repository root is used if present, otherwise the defaults.
    pub fn discover(repo_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let default_path = repo_root.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading config");
            Self::load(&default_path)
        } else {
            tracing::debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            FormatChangesError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `formatter` must split into at least one word
    /// - `extensions` entries must be non-empty and have no leading dots
    /// - `exclude` entries must be valid globs
    /// - `base_branch_candidates` entries and `fallback_base_branch` must be non-empty
    /// - `formatter_timeout_seconds` must be positive
    pub fn validate(&self) -> Result<()> {
        self.formatter_command()?;

        for ext in &self.extensions {
            if ext.is_empty() {
                return Err(FormatChangesError::UserError(
                    "config validation failed: extensions entries must be non-empty".to_string(),
                ));
            }
            if ext.starts_with('.') {
                return Err(FormatChangesError::UserError(format!(
                    "config validation failed: extensions entries must not have leading dots (found '{}'). Use '{}' instead.",
                    ext,
                    ext.trim_start_matches('.')
                )));
            }
        }

        for pattern in &self.exclude {
            Glob::new(pattern.trim()).map_err(|e| {
                FormatChangesError::UserError(format!(
                    "config validation failed: invalid exclude glob '{}': {}",
                    pattern, e
                ))
            })?;
        }

        if self
            .base_branch_candidates
            .iter()
            .any(|b| b.trim().is_empty())
        {
            return Err(FormatChangesError::UserError(
                "config validation failed: base_branch_candidates entries must be non-empty"
                    .to_string(),
            ));
        }

        if self.fallback_base_branch.trim().is_empty() {
            return Err(FormatChangesError::UserError(
                "config validation failed: fallback_base_branch must be non-empty".to_string(),
            ));
        }

        if self.formatter_timeout_seconds == 0 {
            return Err(FormatChangesError::UserError(
                "config validation failed: formatter_timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// The formatter command split into program and leading arguments.
    pub fn formatter_command(&self) -> Result<Vec<String>> {
        let words = shell_words::split(&self.formatter).map_err(|e| {
            FormatChangesError::UserError(format!(
                "failed to parse formatter command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.formatter, e
            ))
        })?;

        if words.is_empty() {
            return Err(FormatChangesError::UserError(
                "config validation failed: formatter must not be empty".to_string(),
            ));
        }

        Ok(words)
    }

    /// Extensions normalized to lowercase.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions.iter().map(|s| s.to_lowercase()).collect()
    }

    /// True when only Python sources are considered.
    pub fn is_python_only(&self) -> bool {
        self.normalized_extensions() == ["py"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.formatter, "ruff");
        assert_eq!(config.extensions, vec!["py"]);
        assert!(config.exclude.is_empty());
        assert_eq!(
            config.base_branch_candidates,
            vec!["main", "master", "develop", "development"]
        );
        assert_eq!(config.fallback_base_branch, "main");
        assert_eq!(config.formatter_timeout_seconds, 60);
        assert!(config.is_python_only());
    }

    #[test]
    fn test_parse_empty_yaml() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
extensions: [py, pyi]
formatter_timeout_seconds: 5
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.extensions, vec!["py", "pyi"]);
        assert_eq!(config.formatter_timeout_seconds, 5);
        // Unspecified values should use defaults
        assert_eq!(config.formatter, "ruff");
        assert_eq!(config.fallback_base_branch, "main");
        assert!(!config.is_python_only());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let yaml = "future_option: true\nformatter: uvx ruff\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.formatter, "uvx ruff");
    }

    #[test]
    fn test_formatter_command_splits_words() {
        let config = Config {
            formatter: "uv run 'ruff'".to_string(),
            ..Config::default()
        };
        assert_eq!(config.formatter_command().unwrap(), vec!["uv", "run", "ruff"]);
    }

    #[test]
    fn test_validate_rejects_empty_formatter() {
        let err = Config::from_yaml("formatter: \"\"\n").unwrap_err();
        assert!(matches!(err, FormatChangesError::UserError(_)));
        assert!(err.to_string().contains("formatter must not be empty"));
    }

    #[test]
    fn test_validate_rejects_unbalanced_quotes() {
        let err = Config::from_yaml("formatter: \"ruff 'oops\"\n").unwrap_err();
        assert!(err.to_string().contains("unmatched quotes"));
    }

    #[test]
    fn test_validate_rejects_leading_dot_extension() {
        let err = Config::from_yaml("extensions: [.py]\n").unwrap_err();
        assert!(err.to_string().contains("Use 'py' instead"));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let err = Config::from_yaml("exclude: ['src/[']\n").unwrap_err();
        assert!(err.to_string().contains("invalid exclude glob"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = Config::from_yaml("formatter_timeout_seconds: 0\n").unwrap_err();
        assert!(err.to_string().contains("formatter_timeout_seconds"));
    }

    #[test]
    fn test_validate_rejects_blank_candidate() {
        let err = Config::from_yaml("base_branch_candidates: [main, '']\n").unwrap_err();
        assert!(err.to_string().contains("base_branch_candidates"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = Config::from_yaml("extensions: [py\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config YAML"));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::discover(temp_dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_reads_default_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "exclude: ['migrations/**']\n",
        )
        .unwrap();

        let config = Config::discover(temp_dir.path(), None).unwrap();
        assert_eq!(config.exclude, vec!["migrations/**"]);
    }

    #[test]
    fn test_discover_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.yaml");
        let err = Config::discover(temp_dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, FormatChangesError::UserError(_)));
        assert!(err.to_string().contains("failed to read config file"));
    }
}
