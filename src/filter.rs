//! Selection of the changed files that get formatted.

use crate::config::Config;
use crate::error::{FormatChangesError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Matches repo-relative paths by extension and exclude globs.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn from_config(config: &Config) -> Result<Self> {
        let exclude = build_globset(&config.exclude).map_err(|e| {
            FormatChangesError::UserError(format!("invalid exclude glob in config: {}", e))
        })?;

        Ok(Self {
            extensions: config.normalized_extensions(),
            exclude,
        })
    }

    /// True if `path` has one of the configured extensions and no exclude glob matches it.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        let Some(ext) = file_extension(&path) else {
            return false;
        };
        let ext = ext.to_lowercase();

        self.extensions.iter().any(|e| *e == ext) && !self.exclude.is_match(&path)
    }
}

fn build_globset(patterns: &[String]) -> std::result::Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let normalized = pattern.trim().replace('\\', "/");
        if normalized.is_empty() {
            continue;
        }
        builder.add(Glob::new(&normalized)?);
    }

    builder.build()
}

fn file_extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.trim();
    if ext.is_empty() { None } else { Some(ext) }
}
