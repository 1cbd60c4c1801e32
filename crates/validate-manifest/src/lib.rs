//! Run pipeline for the manifest validator CLI.
//!
//! Everything here is setup and orchestration around the core engine:
//! resolving the two path renderings, reading and parsing the file, and
//! turning diagnostics into printable lines. Setup failures surface as
//! `anyhow` errors and abort the run; schema violations never do.

use anyhow::{Context, Result};
use manifest_validation::SourcePaths;
use std::fs;
use std::path::Path;
use tracing::debug;

/// How diagnostics are rendered for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The fixed human-readable templates.
    #[default]
    Text,
    /// One JSON object per diagnostic, one per line.
    Json,
}

/// Validate the manifest at `path`, returning one output line per
/// diagnostic, in production order.
///
/// An unreadable file or structurally invalid YAML is a setup failure and
/// returns an error; a manifest full of schema violations is a normal run
/// that returns their rendered lines.
pub fn run(path: &Path, format: OutputFormat) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let documents = manifest_yaml::parse_documents(&content)
        .with_context(|| format!("cannot parse {} as YAML", path.display()))?;
    debug!(documents = documents.len(), "parsed manifest stream");

    let paths = source_paths(path)?;
    let diagnostics = manifest_validation::validate(&documents);
    debug!(count = diagnostics.len(), "validation complete");

    diagnostics
        .iter()
        .map(|diagnostic| match format {
            OutputFormat::Text => Ok(diagnostic.render(&paths)),
            OutputFormat::Json => {
                serde_json::to_string(diagnostic).context("cannot serialize diagnostic")
            }
        })
        .collect()
}

/// Compute the two path renderings used by diagnostic messages: the
/// manifest relative to its own containing directory, and the absolutized
/// path (no symlink resolution).
fn source_paths(path: &Path) -> Result<SourcePaths> {
    let relative = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let absolute = std::path::absolute(path)
        .with_context(|| format!("cannot resolve {}", path.display()))?
        .display()
        .to_string();

    Ok(SourcePaths::new(relative, absolute))
}
