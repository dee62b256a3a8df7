//! Output for `--list`.

use crate::config::Config;
use crate::diff::FileChanges;
use crate::error::{FormatChangesError, Result};
use crate::formatter::render_summary;

/// Message printed when no selected file has changed lines.
pub fn no_changes_message(config: &Config) -> String {
    if config.is_python_only() {
        "No Python files with changed lines in this branch".to_string()
    } else {
        format!(
            "No files with changed lines in this branch (extensions: {})",
            config.normalized_extensions().join(", ")
        )
    }
}

/// Render changed ranges as text or as a JSON array of file records.
pub fn render_listing(changes: &[FileChanges], config: &Config, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(changes).map_err(|e| {
            FormatChangesError::UserError(format!("failed to serialize line ranges: {}", e))
        })?;
        out.push('\n');
        return Ok(out);
    }

    if changes.is_empty() {
        return Ok(format!("{}\n", no_changes_message(config)));
    }

    Ok(render_summary(changes))
}
